//! Plugin error types

use thiserror::Error;

/// Result type for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Reasons a plugin is rejected at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Plugin id is empty
    #[error("plugin must have a valid id")]
    EmptyId,

    /// Plugin name is empty
    #[error("plugin '{id}' must have a valid name")]
    EmptyName { id: String },

    /// Plugin has no execute handler
    #[error("plugin '{id}' must have an execute handler")]
    MissingExecute { id: String },
}

/// Lifecycle phase a hook runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Load,
    Unload,
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookPhase::Load => write!(f, "load"),
            HookPhase::Unload => write!(f, "unload"),
        }
    }
}

/// Plugin-related errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// Plugin failed validation and was not registered
    #[error("Invalid plugin: {0}")]
    Validation(#[from] ValidationError),

    /// A load or unload hook failed
    #[error("Plugin '{plugin}' {phase} hook failed: {reason}")]
    LifecycleHook {
        plugin: String,
        phase: HookPhase,
        reason: String,
    },

    /// Plugin execution failed
    #[error("Plugin '{plugin}' failed to execute: {reason}")]
    Execution { plugin: String, reason: String },

    /// Plugin not found
    #[error("Plugin not found: {0}")]
    NotFound(String),
}

impl PluginError {
    /// Build an execution error for the given plugin.
    pub fn execution(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Execution {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error was raised by registration validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
