//! Plugin behaviour: the execute entry point and lifecycle hooks.

use async_trait::async_trait;
use std::future::Future;

use super::context::PluginContext;
use super::error::PluginResult;

/// The behaviour a plugin author supplies.
///
/// `execute` is required; preview and input-change notifications are
/// optional and default to no-ops.
#[async_trait]
pub trait PluginHandler: Send + Sync {
    /// Perform the plugin's effect for a committed match.
    async fn execute(&self, ctx: &PluginContext) -> PluginResult<()>;

    /// Preview text for the given extracted input.
    fn preview(&self, input: &str) -> Option<String> {
        let _ = input;
        None
    }

    /// Called as the user types while this plugin is the top match.
    fn on_input_change(&self, input: &str) {
        let _ = input;
    }
}

/// A load or unload hook.
///
/// Any `Fn() -> impl Future<Output = PluginResult<()>>` closure is a hook.
/// [`SharedRegistry`](super::SharedRegistry) runs hooks without holding its
/// lock, so a hook may read the registry it is being registered into.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    async fn run(&self) -> PluginResult<()>;
}

#[async_trait]
impl<F, Fut> LifecycleHook for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PluginResult<()>> + Send + 'static,
{
    async fn run(&self) -> PluginResult<()> {
        (self)().await
    }
}

/// Handler backed by a synchronous closure.
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&PluginContext) -> PluginResult<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> PluginHandler for FnHandler<F>
where
    F: Fn(&PluginContext) -> PluginResult<()> + Send + Sync,
{
    async fn execute(&self, ctx: &PluginContext) -> PluginResult<()> {
        (self.f)(ctx)
    }
}

/// Handler that notifies the host with a templated message.
///
/// `{input}` in the template is replaced by the extracted input.
#[derive(Debug, Clone)]
pub struct NotifyHandler {
    template: String,
}

impl NotifyHandler {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn render(&self, input: &str) -> String {
        self.template.replace("{input}", input)
    }
}

#[async_trait]
impl PluginHandler for NotifyHandler {
    async fn execute(&self, ctx: &PluginContext) -> PluginResult<()> {
        ctx.show_notification(&self.render(&ctx.input));
        Ok(())
    }

    fn preview(&self, input: &str) -> Option<String> {
        Some(self.render(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_closure_is_a_lifecycle_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hook = move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), PluginError>(())
            }
        };

        hook.run().await.unwrap();
        hook.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failing_closure_hook() {
        let hook = || async { Err::<(), _>(PluginError::NotFound("db".to_string())) };
        assert!(hook.run().await.is_err());
    }

    #[test]
    fn test_notify_handler_preview_substitutes_input() {
        let handler = NotifyHandler::new("Translating: {input}");
        assert_eq!(
            handler.preview("hello").as_deref(),
            Some("Translating: hello")
        );
    }
}
