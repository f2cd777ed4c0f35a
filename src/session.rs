//! Search session: the host-side loop around the matcher.
//!
//! Holds the current query and its ranked matches, tracks the selection,
//! and executes the selected plugin with a freshly built [`PluginContext`].
//! Usage statistics are recorded per plugin but never fed back into
//! matching.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};

use crate::metrics::MetricsService;
use crate::plugin::{
    HostServices, MatchResult, Platform, Plugin, PluginContext, PluginError, PluginMatcher,
    PluginMetadata, PluginResult, SharedRegistry,
};

/// Query state for one launcher window.
pub struct SearchSession {
    registry: SharedRegistry,
    matcher: PluginMatcher,
    host: Arc<dyn HostServices>,
    metrics: Arc<MetricsService>,
    platform: Platform,
    max_results: usize,

    query: String,
    matches: Vec<MatchResult>,
    selected_index: usize,
    show_list: bool,

    active_plugin: Option<Arc<Plugin>>,
    metadata: HashMap<String, PluginMetadata>,
}

impl SearchSession {
    pub fn new(registry: SharedRegistry, host: Arc<dyn HostServices>) -> Self {
        Self {
            registry,
            matcher: PluginMatcher::new(),
            host,
            metrics: Arc::new(MetricsService::disabled()),
            platform: Platform::current(),
            max_results: 0,
            query: String::new(),
            matches: vec![],
            selected_index: 0,
            show_list: false,
            active_plugin: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Limit the number of matches kept (0 = unlimited).
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsService>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Update the query and re-match against the enabled plugins.
    ///
    /// Resets the selection to the top match.
    pub async fn set_query(&mut self, query: impl Into<String>) -> &[MatchResult] {
        self.query = query.into();
        self.selected_index = 0;

        if self.query.trim().is_empty() {
            self.matches.clear();
            self.show_list = false;
            return &self.matches;
        }

        let plugins = self.registry.get_enabled().await;
        let started = Instant::now();
        let mut matches = self.matcher.match_query(&self.query, &plugins);
        self.metrics
            .match_evaluated(&matches, started.elapsed().as_secs_f64());

        if self.max_results > 0 {
            matches.truncate(self.max_results);
        }

        if let Some(top) = matches.first() {
            top.plugin.notify_input_change(&top.extracted_input);
        }

        debug!("Matched {} plugins for query: \"{}\"", matches.len(), self.query);
        self.show_list = !matches.is_empty();
        self.matches = matches;
        &self.matches
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn show_list(&self) -> bool {
        self.show_list
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&MatchResult> {
        self.matches.get(self.selected_index)
    }

    /// Select a match by index; returns false if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.matches.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// Move the selection down, wrapping to the top.
    pub fn select_next(&mut self) {
        let Some(max_index) = self.matches.len().checked_sub(1) else {
            return;
        };
        self.selected_index = if self.selected_index < max_index {
            self.selected_index + 1
        } else {
            0
        };
    }

    /// Move the selection up, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        let Some(max_index) = self.matches.len().checked_sub(1) else {
            return;
        };
        self.selected_index = if self.selected_index > 0 {
            self.selected_index - 1
        } else {
            max_index
        };
    }

    /// Preview of the selected match.
    pub fn preview(&self) -> Option<String> {
        let selected = self.selected()?;
        selected.plugin.preview(&selected.extracted_input)
    }

    /// Execute the selected match.
    pub async fn execute_selected(&mut self) -> PluginResult<()> {
        let selected = self
            .selected()
            .cloned()
            .ok_or_else(|| PluginError::NotFound("no plugin selected".to_string()))?;

        let mut ctx = PluginContext::new(
            selected.extracted_input.clone(),
            self.query.clone(),
            self.platform,
            Arc::clone(&self.host),
        );
        if let Some(clipboard) = self.host.read_clipboard().await {
            ctx = ctx.with_clipboard(clipboard);
        }
        if let Some(selection) = self.host.read_selection().await {
            ctx = ctx.with_selection(selection);
        }

        self.set_active_plugin(Arc::clone(&selected.plugin));

        info!(
            "Executing plugin '{}' with input \"{}\"",
            selected.plugin.id(),
            ctx.input
        );
        let result = selected.plugin.execute(&ctx).await;
        self.metrics
            .plugin_executed(selected.plugin.id(), result.is_ok());

        if let Err(e) = &result {
            error!("Plugin '{}' failed: {}", selected.plugin.id(), e);
        }
        result
    }

    /// Mark a plugin as active and count the use.
    pub fn set_active_plugin(&mut self, plugin: Arc<Plugin>) {
        debug!("Setting active plugin: {}", plugin.name());
        self.increment_usage(&plugin);
        self.active_plugin = Some(plugin);
    }

    pub fn active_plugin(&self) -> Option<&Arc<Plugin>> {
        self.active_plugin.as_ref()
    }

    pub fn clear_active(&mut self) {
        self.active_plugin = None;
    }

    /// Usage statistics for a plugin, if it has been used.
    pub fn metadata(&self, plugin_id: &str) -> Option<&PluginMetadata> {
        self.metadata.get(plugin_id)
    }

    /// Clear query, matches and selection.
    pub fn reset(&mut self) {
        debug!("Resetting search state");
        self.query.clear();
        self.matches.clear();
        self.selected_index = 0;
        self.show_list = false;
    }

    fn increment_usage(&mut self, plugin: &Plugin) {
        let entry = self
            .metadata
            .entry(plugin.id().to_string())
            .or_insert_with(|| PluginMetadata {
                enabled: plugin.is_enabled(),
                priority: plugin.priority(),
                ..PluginMetadata::new(plugin.id())
            });
        entry.usage_count += 1;
        entry.last_used = Some(now_millis());
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
