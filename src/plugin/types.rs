//! Core plugin data types

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::context::PluginContext;
use super::error::{PluginError, PluginResult, ValidationError};
use super::handler::{LifecycleHook, PluginHandler};

/// Priority used for tie-breaking when none is configured.
pub const DEFAULT_PRIORITY: u8 = 50;

/// Highest accepted priority.
pub const MAX_PRIORITY: u8 = 100;

/// Descriptive plugin information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique, stable identifier (registry key)
    pub id: String,
    /// Display name, also the target of fuzzy matching
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Plugin version
    #[serde(default)]
    pub version: String,
    /// Plugin author
    #[serde(default)]
    pub author: String,
}

/// Matching and behaviour configuration for a plugin
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Trigger words, tested in order, case-insensitive
    pub keywords: Vec<String>,
    /// Pattern tested against the whole trimmed query
    pub pattern: Option<Regex>,
    /// Opt into subsequence scoring against the display name
    pub fuzzy_match: bool,
    /// File extensions the plugin accepts (e.g. ".png")
    pub file_types: Vec<String>,
    /// Tie-break priority, 0-100
    pub priority: Option<u8>,
    /// Disabled plugins stay registered but never match
    pub enabled: bool,
    /// Shown prominently by the host
    pub featured: bool,
    /// Capabilities requested from the host (e.g. "clipboard")
    pub permissions: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            keywords: vec![],
            pattern: None,
            fuzzy_match: false,
            file_types: vec![],
            priority: None,
            enabled: true,
            featured: false,
            permissions: vec![],
        }
    }
}

/// A registered capability: identity, matching configuration and behaviour.
///
/// Cheap to clone; the handler and hooks are shared.
#[derive(Clone)]
pub struct Plugin {
    pub(crate) info: PluginInfo,
    pub(crate) config: PluginConfig,
    pub(crate) handler: Option<Arc<dyn PluginHandler>>,
    pub(crate) on_load: Option<Arc<dyn LifecycleHook>>,
    pub(crate) on_unload: Option<Arc<dyn LifecycleHook>>,
}

impl Plugin {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Configured priority, or [`DEFAULT_PRIORITY`].
    pub fn priority(&self) -> u8 {
        self.config.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn has_execute(&self) -> bool {
        self.handler.is_some()
    }

    pub fn has_load_hook(&self) -> bool {
        self.on_load.is_some()
    }

    pub fn has_unload_hook(&self) -> bool {
        self.on_unload.is_some()
    }

    /// Copy of this plugin with the enabled flag replaced.
    pub fn with_enabled(&self, enabled: bool) -> Self {
        let mut plugin = self.clone();
        plugin.config.enabled = enabled;
        plugin
    }

    /// Check the registration contract.
    ///
    /// Only empty strings are rejected; whitespace is a valid id or name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.info.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.info.name.is_empty() {
            return Err(ValidationError::EmptyName {
                id: self.info.id.clone(),
            });
        }
        if self.handler.is_none() {
            return Err(ValidationError::MissingExecute {
                id: self.info.id.clone(),
            });
        }
        Ok(())
    }

    /// Run the plugin's execute entry point.
    pub async fn execute(&self, ctx: &PluginContext) -> PluginResult<()> {
        match &self.handler {
            Some(handler) => handler.execute(ctx).await,
            None => Err(PluginError::execution(
                self.id(),
                "no execute handler configured",
            )),
        }
    }

    /// Preview for the given extracted input, if the plugin offers one.
    pub fn preview(&self, input: &str) -> Option<String> {
        self.handler.as_ref().and_then(|h| h.preview(input))
    }

    /// Forward an input change to the handler.
    pub fn notify_input_change(&self, input: &str) {
        if let Some(handler) = &self.handler {
            handler.on_input_change(input);
        }
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("info", &self.info)
            .field("config", &self.config)
            .field("handler", &self.handler.is_some())
            .field("on_load", &self.on_load.is_some())
            .field("on_unload", &self.on_unload.is_some())
            .finish()
    }
}

/// Which strategy produced a match.
///
/// `FileType` and `Always` are reserved; the matcher does not produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    Keyword,
    Regex,
    Fuzzy,
    FileType,
    Always,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Keyword => "keyword",
            MatchType::Regex => "regex",
            MatchType::Fuzzy => "fuzzy",
            MatchType::FileType => "fileType",
            MatchType::Always => "always",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ranked outcome of matching a query.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched plugin
    pub plugin: Arc<Plugin>,
    /// Score, 0-100
    pub score: u32,
    /// Payload handed to the plugin
    pub extracted_input: String,
    /// Strategy that produced the match
    pub match_type: MatchType,
}

/// Host-side bookkeeping for a plugin (usage statistics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    pub id: String,
    pub enabled: bool,
    pub priority: u8,
    /// Unix timestamp in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<u64>,
    #[serde(default)]
    pub usage_count: u64,
}

impl PluginMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            priority: DEFAULT_PRIORITY,
            last_used: None,
            usage_count: 0,
        }
    }
}
