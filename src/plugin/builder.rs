//! Plugin Builder - fluent API for creating plugins

use regex::Regex;
use std::sync::Arc;

use super::context::PluginContext;
use super::error::PluginResult;
use super::handler::{FnHandler, LifecycleHook, NotifyHandler, PluginHandler};
use super::types::{Plugin, PluginConfig, PluginInfo, MAX_PRIORITY};

/// Builder for creating plugins
///
/// # Example
///
/// ```rust,ignore
/// let plugin = PluginBuilder::new("translate", "Translate")
///     .keywords(["translate", "fy"])
///     .priority(90)
///     .handler(TranslateHandler::default())
///     .build();
/// ```
pub struct PluginBuilder {
    info: PluginInfo,
    config: PluginConfig,
    handler: Option<Arc<dyn PluginHandler>>,
    on_load: Option<Arc<dyn LifecycleHook>>,
    on_unload: Option<Arc<dyn LifecycleHook>>,
}

impl PluginBuilder {
    /// Create a new plugin builder
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            info: PluginInfo {
                id: id.into(),
                name: name.into(),
                version: "0.1.0".to_string(),
                ..Default::default()
            },
            config: PluginConfig::default(),
            handler: None,
            on_load: None,
            on_unload: None,
        }
    }

    /// Set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Set version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    /// Set author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.info.author = author.into();
        self
    }

    /// Replace the whole matching configuration
    pub fn config(mut self, config: PluginConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a trigger keyword
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.config.keywords.push(keyword.into());
        self
    }

    /// Add several trigger keywords, in order
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .keywords
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Set the whole-query pattern
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.config.pattern = Some(pattern);
        self
    }

    /// Opt into fuzzy matching against the display name
    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.config.fuzzy_match = fuzzy;
        self
    }

    /// Set tie-break priority (clamped to 0-100 on build)
    pub fn priority(mut self, priority: u8) -> Self {
        self.config.priority = Some(priority);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.config.featured = featured;
        self
    }

    pub fn file_type(mut self, extension: impl Into<String>) -> Self {
        self.config.file_types.push(extension.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.config.permissions.push(permission.into());
        self
    }

    /// Set the execute handler
    pub fn handler(mut self, handler: impl PluginHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Use a synchronous closure as the execute handler
    pub fn execute<F>(self, f: F) -> Self
    where
        F: Fn(&PluginContext) -> PluginResult<()> + Send + Sync + 'static,
    {
        self.handler(FnHandler::new(f))
    }

    /// Notify the host with a templated message on execute
    pub fn notify(self, template: impl Into<String>) -> Self {
        self.handler(NotifyHandler::new(template))
    }

    /// Set the load hook
    pub fn on_load(mut self, hook: impl LifecycleHook + 'static) -> Self {
        self.on_load = Some(Arc::new(hook));
        self
    }

    /// Set the unload hook
    pub fn on_unload(mut self, hook: impl LifecycleHook + 'static) -> Self {
        self.on_unload = Some(Arc::new(hook));
        self
    }

    /// Build the plugin
    ///
    /// Priority is clamped to 100. No other validation happens here; the
    /// registry validates on `register`.
    pub fn build(mut self) -> Plugin {
        self.config.priority = self.config.priority.map(|p| p.min(MAX_PRIORITY));

        Plugin {
            info: self.info,
            config: self.config,
            handler: self.handler,
            on_load: self.on_load,
            on_unload: self.on_unload,
        }
    }
}
