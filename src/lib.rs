//! Honey Launcher Library
//!
//! This crate provides the core of the Honey launcher: the plugin registry,
//! the matching engine that decides which plugins a typed query addresses,
//! and the search session that ties them to a host application.

pub mod config;
pub mod error;
pub mod manifest;
pub mod metrics;
pub mod plugin;
pub mod session;

pub use config::{LauncherConfig, LauncherSettings};
pub use error::{Error, Result};
pub use manifest::PluginManifest;
pub use metrics::{MetricNames, MetricsConfig, MetricsService};
pub use plugin::{
    fuzzy_score, HostServices, MatchResult, MatchType, Platform, Plugin, PluginBuilder,
    PluginContext, PluginError, PluginMatcher, PluginRegistry, SharedRegistry,
};
pub use session::SearchSession;
