//! Execution context handed to a plugin when the user commits a match.
//!
//! The launcher never inspects the context itself; it is built by the host
//! at execution time and carries the host's side-effect callbacks
//! (notifications, clipboard, URL opening, window control, result display).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::PluginResult;

/// Operating system the launcher is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::Mac,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mac" | "macos" | "darwin" => Ok(Platform::Mac),
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// How a plugin result should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Text,
    Html,
    List,
    Custom,
}

/// Callback run when the user triggers a [`PluginAction`].
pub type ActionHandler = Arc<dyn Fn() + Send + Sync>;

/// An action offered alongside a displayed result.
///
/// The handler is not serialized; a deserialized action is a label only.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PluginAction {
    /// Action label
    pub name: String,
    /// Optional keyboard shortcut hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip)]
    handler: Option<ActionHandler>,
}

impl PluginAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn with_handler(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Run the handler; returns false if the action has none.
    pub fn invoke(&self) -> bool {
        match &self.handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl PartialEq for PluginAction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.shortcut == other.shortcut
    }
}

impl std::fmt::Debug for PluginAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginAction")
            .field("name", &self.name)
            .field("shortcut", &self.shortcut)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Structured result a plugin asks the host to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginOutput {
    pub kind: OutputKind,
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<PluginAction>,
}

impl PluginOutput {
    /// Plain text output with no actions.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: OutputKind::Text,
            content: serde_json::Value::String(content.into()),
            actions: vec![],
        }
    }

    /// List output from the given items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: OutputKind::List,
            content: serde_json::Value::Array(
                items
                    .into_iter()
                    .map(|s| serde_json::Value::String(s.into()))
                    .collect(),
            ),
            actions: vec![],
        }
    }

    /// Attach an action.
    pub fn with_action(mut self, action: PluginAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Side effects the host application exposes to plugins.
#[async_trait]
pub trait HostServices: Send + Sync {
    /// Show a transient notification.
    fn show_notification(&self, message: &str);

    /// Write text to the system clipboard.
    async fn copy_to_clipboard(&self, text: &str) -> PluginResult<()>;

    /// Open a URL in the default handler.
    async fn open_url(&self, url: &str) -> PluginResult<()>;

    /// Hide the launcher window.
    async fn hide_window(&self) -> PluginResult<()>;

    /// Display a structured result.
    fn show_result(&self, output: PluginOutput);

    /// Current clipboard text, captured when a plugin executes.
    async fn read_clipboard(&self) -> Option<String> {
        None
    }

    /// Currently selected text, captured when a plugin executes.
    async fn read_selection(&self) -> Option<String> {
        None
    }
}

/// Context passed to [`PluginHandler::execute`](super::PluginHandler::execute).
#[derive(Clone)]
pub struct PluginContext {
    /// Extracted payload (keyword stripped for keyword matches)
    pub input: String,
    /// The raw query as typed
    pub raw_input: String,
    /// Host platform
    pub platform: Platform,
    /// Current clipboard text, if the host captured it
    pub clipboard: Option<String>,
    /// Current text selection, if the host captured it
    pub selection: Option<String>,
    host: Arc<dyn HostServices>,
}

impl PluginContext {
    pub fn new(
        input: impl Into<String>,
        raw_input: impl Into<String>,
        platform: Platform,
        host: Arc<dyn HostServices>,
    ) -> Self {
        Self {
            input: input.into(),
            raw_input: raw_input.into(),
            platform,
            clipboard: None,
            selection: None,
            host,
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl Into<String>) -> Self {
        self.clipboard = Some(clipboard.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    pub fn show_notification(&self, message: &str) {
        self.host.show_notification(message);
    }

    pub async fn copy_to_clipboard(&self, text: &str) -> PluginResult<()> {
        self.host.copy_to_clipboard(text).await
    }

    pub async fn open_url(&self, url: &str) -> PluginResult<()> {
        self.host.open_url(url).await
    }

    pub async fn hide_window(&self) -> PluginResult<()> {
        self.host.hide_window().await
    }

    pub fn show_result(&self, output: PluginOutput) {
        self.host.show_result(output);
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("input", &self.input)
            .field("raw_input", &self.raw_input)
            .field("platform", &self.platform)
            .field("clipboard", &self.clipboard)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Mac);
        assert_eq!(" Windows ".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_output_serializes_lowercase_kind() {
        let output =
            PluginOutput::text("= 15").with_action(PluginAction::new("Copy").with_shortcut("Enter"));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["content"], "= 15");
        assert_eq!(json["actions"][0]["shortcut"], "Enter");
    }

    #[test]
    fn test_action_handler_invoked() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let action = PluginAction::new("Copy").with_handler(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(action.invoke());
        assert!(action.clone().invoke());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let json = serde_json::to_string(&action).unwrap();
        let label: PluginAction = serde_json::from_str(&json).unwrap();
        assert_eq!(label, action);
        assert!(!label.invoke());
    }

    #[test]
    fn test_list_output() {
        let output = PluginOutput::list(["a", "b"]);
        assert_eq!(output.kind, OutputKind::List);
        assert_eq!(output.content, serde_json::json!(["a", "b"]));
        assert!(output.actions.is_empty());
    }
}
