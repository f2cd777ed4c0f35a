//! Common test utilities for Honey launcher integration tests.
//!
//! Shared fixture plugins, a host that records side effects, and hooks
//! that count their invocations.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;

use honey_launcher::plugin::{PluginOutput, PluginResult};
use honey_launcher::{HostServices, Plugin, PluginBuilder, PluginError};

// ========== Fixture Plugins ==========

/// Keyword plugin: `translate`, `fy`.
pub fn translate_plugin() -> Plugin {
    PluginBuilder::new("translate", "Translate")
        .description("Translate text into another language")
        .keywords(["translate", "fy"])
        .priority(90)
        .featured(true)
        .notify("Translating: {input}")
        .build()
}

/// Pattern plugin for arithmetic expressions.
pub fn calculator_plugin() -> Plugin {
    PluginBuilder::new("calculator", "Calculator")
        .description("Evaluate arithmetic expressions")
        .pattern(Regex::new(r"^[\d+\-*/().\s]+$").unwrap())
        .priority(80)
        .notify("Calculating: {input}")
        .build()
}

/// Fuzzy-only plugin matched against its display name.
pub fn fuzzy_plugin(id: &str, name: &str) -> Plugin {
    PluginBuilder::new(id, name)
        .fuzzy(true)
        .notify("{input}")
        .build()
}

/// Keyword plugin with an explicit priority.
pub fn keyword_plugin(id: &str, keyword: &str, priority: u8) -> Plugin {
    PluginBuilder::new(id, id)
        .keyword(keyword)
        .priority(priority)
        .notify("{input}")
        .build()
}

// ========== Hooks ==========

/// Hook that counts invocations and optionally fails.
pub fn counting_hook(
    counter: Arc<AtomicUsize>,
    fail: bool,
) -> impl Fn() -> BoxFuture<'static, PluginResult<()>> + Send + Sync + 'static {
    move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(PluginError::execution("hook", "simulated failure"))
            } else {
                Ok(())
            }
        }
        .boxed()
    }
}

// ========== Host ==========

/// Host services that record every side effect.
#[derive(Default)]
pub struct RecordingHost {
    pub notifications: Mutex<Vec<String>>,
    pub clipboard: Mutex<Vec<String>>,
    pub urls: Mutex<Vec<String>>,
    pub results: Mutex<Vec<PluginOutput>>,
    pub hides: AtomicUsize,
    /// Clipboard text reported to executing plugins
    pub current_clipboard: Option<String>,
    /// Selection reported to executing plugins
    pub current_selection: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Host that reports the given clipboard and selection text.
    pub fn with_captured(clipboard: &str, selection: &str) -> Arc<Self> {
        Arc::new(Self {
            current_clipboard: Some(clipboard.to_string()),
            current_selection: Some(selection.to_string()),
            ..Self::default()
        })
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostServices for RecordingHost {
    fn show_notification(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }

    async fn copy_to_clipboard(&self, text: &str) -> PluginResult<()> {
        self.clipboard.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn open_url(&self, url: &str) -> PluginResult<()> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn hide_window(&self) -> PluginResult<()> {
        self.hides.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn show_result(&self, output: PluginOutput) {
        self.results.lock().unwrap().push(output);
    }

    async fn read_clipboard(&self) -> Option<String> {
        self.current_clipboard.clone()
    }

    async fn read_selection(&self) -> Option<String> {
        self.current_selection.clone()
    }
}
