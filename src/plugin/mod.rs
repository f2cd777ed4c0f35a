//! Honey Plugin System
//!
//! Plugins are capability descriptors: an id and display name, matching
//! configuration (keywords, a whole-query pattern, fuzzy opt-in, priority)
//! and an execute handler with optional load/unload hooks.
//!
//! - **Registry**: the live catalog, validating plugins and running their
//!   lifecycle hooks
//! - **Matcher**: ranks enabled plugins against the text typed into the
//!   launcher and extracts the payload for each match
//!
//! # Example
//!
//! ```rust,ignore
//! use honey_launcher::plugin::{PluginBuilder, PluginMatcher, PluginRegistry};
//!
//! let plugin = PluginBuilder::new("translate", "Translate")
//!     .keywords(["translate", "fy"])
//!     .notify("Translating: {input}")
//!     .build();
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(plugin).await?;
//!
//! let matches = PluginMatcher::new().match_query("fy hello", &registry.get_enabled());
//! assert_eq!(matches[0].extracted_input, "hello");
//! ```

mod builder;
mod context;
mod error;
mod handler;
mod matcher;
mod registry;
mod types;

pub use builder::PluginBuilder;
pub use context::{
    ActionHandler, HostServices, OutputKind, Platform, PluginAction, PluginContext, PluginOutput,
};
pub use error::{HookPhase, PluginError, PluginResult, ValidationError};
pub use handler::{FnHandler, LifecycleHook, NotifyHandler, PluginHandler};
pub use matcher::{
    fuzzy_score, PluginMatcher, FUZZY_MAX_SCORE, FUZZY_THRESHOLD, KEYWORD_EXACT_SCORE,
    KEYWORD_PREFIX_SCORE, REGEX_DEFAULT_SCORE,
};
pub use registry::{PluginRegistry, SharedRegistry};
pub use types::{
    MatchResult, MatchType, Plugin, PluginConfig, PluginInfo, PluginMetadata, DEFAULT_PRIORITY,
    MAX_PRIORITY,
};
