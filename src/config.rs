//! Launcher configuration management.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::manifest::PluginManifest;
use crate::plugin::Platform;

/// Main configuration for the launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Launcher behaviour.
    #[serde(default)]
    pub launcher: LauncherSettings,

    /// Plugins declared in the config file.
    #[serde(default)]
    pub plugins: Vec<PluginManifest>,
}

/// Launcher behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherSettings {
    /// Platform reported to plugins.
    #[serde(default)]
    pub platform: Platform,

    /// Maximum matches shown (0 = unlimited).
    #[serde(default)]
    pub max_results: usize,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            max_results: 0,
            log_level: default_log_level(),
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let mut translate = PluginManifest::new("translate", "Translate");
        translate.description = "Translate text into another language".to_string();
        translate.version = "1.0.0".to_string();
        translate.author = "Honey Team".to_string();
        translate.keywords = vec!["translate".to_string(), "fy".to_string()];
        translate.priority = Some(90);
        translate.featured = true;
        translate.template = "Translating: \"{input}\"".to_string();

        let mut calculator = PluginManifest::new("calculator", "Calculator");
        calculator.description = "Evaluate arithmetic expressions".to_string();
        calculator.version = "1.0.0".to_string();
        calculator.author = "Honey Team".to_string();
        calculator.pattern = Some(r"^[\d+\-*/().\s]+$".to_string());
        calculator.priority = Some(80);
        calculator.fuzzy_match = true;
        calculator.template = "Calculating: {input}".to_string();

        Self {
            launcher: LauncherSettings::default(),
            plugins: vec![translate, calculator],
        }
    }
}

impl LauncherConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject configs with duplicate plugin ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for manifest in &self.plugins {
            if !seen.insert(manifest.id.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate plugin id '{}'",
                    manifest.id
                )));
            }
        }
        Ok(())
    }

    /// Apply `HONEY_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(platform) = env_string("HONEY_PLATFORM") {
            match platform.parse() {
                Ok(platform) => self.launcher.platform = platform,
                Err(e) => warn!("Invalid value for HONEY_PLATFORM: {}", e),
            }
        }
        if let Some(max_results) = env_string("HONEY_MAX_RESULTS") {
            match max_results.parse() {
                Ok(max_results) => self.launcher.max_results = max_results,
                Err(_) => warn!("Invalid value for HONEY_MAX_RESULTS: {}", max_results),
            }
        }
        if let Some(log_level) = Self::env_log_level() {
            self.launcher.log_level = log_level;
        }
    }

    /// Log level from `HONEY_LOG_LEVEL`, readable before the config is loaded.
    pub fn env_log_level() -> Option<String> {
        env_string("HONEY_LOG_LEVEL")
    }
}

fn env_string(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
