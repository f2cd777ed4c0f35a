//! End-to-end launcher flow.
//!
//! Config file -> manifests -> registry -> session -> plugin execution.

mod common;

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::*;
use honey_launcher::plugin::{PluginAction, PluginHandler, PluginOutput, PluginResult};
use honey_launcher::{
    LauncherConfig, MatchType, Platform, PluginBuilder, PluginContext, PluginError,
    SearchSession, SharedRegistry,
};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[launcher]
platform = "linux"
max_results = 5

[[plugins]]
id = "translate"
name = "Translate"
keywords = ["translate", "fy"]
priority = 90
template = "Translating: {input}"

[[plugins]]
id = "calculator"
name = "Calculator"
pattern = '^[\d+\-*/().\s]+$'
fuzzy_match = true
template = "Calculating: {input}"

[[plugins]]
id = "hidden"
name = "Hidden"
keywords = ["translate"]
enabled = false
"#;

async fn registry_from(config: &LauncherConfig) -> SharedRegistry {
    let registry = SharedRegistry::new();
    for manifest in &config.plugins {
        registry
            .register(manifest.to_plugin().unwrap())
            .await
            .unwrap();
    }
    registry
}

fn load_config() -> LauncherConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    LauncherConfig::load(file.path()).unwrap()
}

#[tokio::test]
async fn test_config_to_execution() {
    // Arrange
    let config = load_config();
    assert_eq!(config.launcher.platform, Platform::Linux);
    let registry = registry_from(&config).await;
    assert_eq!(registry.len().await, 3);

    let host = RecordingHost::new();
    let mut session = SearchSession::new(registry, host.clone())
        .with_platform(config.launcher.platform)
        .with_max_results(config.launcher.max_results);

    // Act
    let matches = session.set_query("translate   good morning").await;

    // Assert
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].plugin.id(), "translate");
    assert_eq!(matches[0].match_type, MatchType::Keyword);

    session.execute_selected().await.unwrap();
    assert_eq!(host.notifications(), vec!["Translating: good morning"]);
    assert_eq!(session.metadata("translate").unwrap().usage_count, 1);
}

#[tokio::test]
async fn test_calculator_fuzzy_and_regex() {
    let config = load_config();
    let registry = registry_from(&config).await;
    let host = RecordingHost::new();
    let mut session = SearchSession::new(registry, host.clone());

    let matches = session.set_query("(2 + 3) * 4").await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_type, MatchType::Regex);
    assert_eq!(matches[0].score, 80);

    let matches = session.set_query("calc").await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_type, MatchType::Fuzzy);

    session.execute_selected().await.unwrap();
    assert_eq!(host.notifications(), vec!["Calculating: calc"]);
}

#[tokio::test]
async fn test_saved_default_config_reloads() {
    let file = NamedTempFile::new().unwrap();
    LauncherConfig::default().save(file.path()).unwrap();

    let config = LauncherConfig::load(file.path()).unwrap();
    let registry = registry_from(&config).await;

    assert!(registry.has("translate").await);
    assert!(registry.has("calculator").await);
}

// ========== Host Services ==========

/// Shares the payload through every host service.
struct ShareHandler {
    action_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PluginHandler for ShareHandler {
    async fn execute(&self, ctx: &PluginContext) -> PluginResult<()> {
        ctx.copy_to_clipboard(&ctx.input).await?;
        ctx.open_url(&format!("https://example.com/?q={}", ctx.input))
            .await?;

        let calls = self.action_calls.clone();
        let captured = [
            ctx.clipboard.clone().unwrap_or_default(),
            ctx.selection.clone().unwrap_or_default(),
        ];
        ctx.show_result(
            PluginOutput::list(captured).with_action(
                PluginAction::new("Share again")
                    .with_shortcut("Enter")
                    .with_handler(move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                    }),
            ),
        );

        ctx.hide_window().await
    }
}

#[tokio::test]
async fn test_plugin_uses_host_services() {
    // Arrange
    let action_calls = Arc::new(AtomicUsize::new(0));
    let registry = SharedRegistry::new();
    registry
        .register(
            PluginBuilder::new("share", "Share")
                .keyword("share")
                .handler(ShareHandler {
                    action_calls: action_calls.clone(),
                })
                .build(),
        )
        .await
        .unwrap();

    let host = RecordingHost::with_captured("copied text", "selected text");
    let mut session = SearchSession::new(registry, host.clone());

    // Act
    session.set_query("share rust").await;
    session.execute_selected().await.unwrap();

    // Assert
    assert_eq!(host.clipboard.lock().unwrap().as_slice(), ["rust".to_string()]);
    assert_eq!(
        host.urls.lock().unwrap().as_slice(),
        ["https://example.com/?q=rust".to_string()]
    );
    assert_eq!(host.hides.load(Ordering::SeqCst), 1);

    let results = host.results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].content,
        serde_json::json!(["copied text", "selected text"])
    );
    assert_eq!(results[0].actions[0].shortcut.as_deref(), Some("Enter"));
    assert!(results[0].actions[0].invoke());
    assert_eq!(action_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_closure_plugin_executes() {
    let registry = SharedRegistry::new();
    registry
        .register(
            PluginBuilder::new("echo", "Echo")
                .keyword("echo")
                .execute(|ctx| {
                    ctx.show_notification(&format!("{} ({})", ctx.input, ctx.raw_input));
                    Ok(())
                })
                .build(),
        )
        .await
        .unwrap();

    let host = RecordingHost::new();
    let mut session = SearchSession::new(registry, host.clone());

    session.set_query("echo hi there").await;
    session.execute_selected().await.unwrap();

    assert_eq!(host.notifications(), vec!["hi there (echo hi there)"]);
}

#[tokio::test]
async fn test_failing_execute_propagates() {
    let registry = SharedRegistry::new();
    registry
        .register(
            PluginBuilder::new("broken", "Broken")
                .keyword("broken")
                .execute(|ctx| {
                    Err(PluginError::execution(
                        "broken",
                        format!("cannot handle '{}'", ctx.input),
                    ))
                })
                .build(),
        )
        .await
        .unwrap();

    let host = RecordingHost::new();
    let mut session = SearchSession::new(registry, host.clone());

    session.set_query("broken input").await;
    let err = session.execute_selected().await.unwrap_err();

    assert!(matches!(
        err,
        PluginError::Execution { ref plugin, ref reason }
            if plugin == "broken" && reason == "cannot handle 'input'"
    ));
    assert!(host.notifications().is_empty());
    assert_eq!(session.metadata("broken").unwrap().usage_count, 1);
}
