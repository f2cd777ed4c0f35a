//! Plugin manifests declared in the launcher config.
//!
//! A manifest describes a plugin's identity and matching rules in TOML and
//! is compiled into a [`Plugin`] whose handler notifies the host with a
//! templated message. Patterns are compiled here, so a malformed pattern is
//! reported when the config is loaded rather than while matching.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::plugin::{
    NotifyHandler, Plugin, PluginBuilder, PluginConfig, PluginInfo, MAX_PRIORITY,
};

fn default_true() -> bool {
    true
}

fn default_template() -> String {
    "{input}".to_string()
}

/// TOML description of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin id
    pub id: String,
    /// Display name (fuzzy match target)
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,

    /// Trigger keywords, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Regular expression matched against the whole query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub fuzzy_match: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
    /// Tie-break priority, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    /// Notification shown on execute; `{input}` is replaced by the payload
    #[serde(default = "default_template")]
    pub template: String,
}

impl PluginManifest {
    /// Minimal manifest with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: String::new(),
            author: String::new(),
            keywords: vec![],
            pattern: None,
            fuzzy_match: false,
            file_types: vec![],
            priority: None,
            enabled: true,
            featured: false,
            permissions: vec![],
            template: default_template(),
        }
    }

    /// Compile the manifest into a plugin.
    pub fn to_plugin(&self) -> Result<Plugin> {
        if let Some(priority) = self.priority {
            if priority > MAX_PRIORITY {
                return Err(Error::Manifest(format!(
                    "plugin '{}': priority {} is outside 0-100",
                    self.id, priority
                )));
            }
        }

        let pattern = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| Error::Pattern {
                plugin: self.id.clone(),
                source,
            })?;

        let plugin = PluginBuilder::new(self.id.clone(), self.name.clone())
            .description(self.description.clone())
            .version(self.version.clone())
            .author(self.author.clone())
            .config(PluginConfig {
                keywords: self.keywords.clone(),
                pattern,
                fuzzy_match: self.fuzzy_match,
                file_types: self.file_types.clone(),
                priority: self.priority,
                enabled: self.enabled,
                featured: self.featured,
                permissions: self.permissions.clone(),
            })
            .handler(NotifyHandler::new(self.template.clone()))
            .build();

        Ok(plugin)
    }

    /// Identity part of the manifest.
    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            author: self.author.clone(),
        }
    }
}
