//! Plugin Registry - manages plugin lifecycle

use super::error::{HookPhase, PluginError, PluginResult};
use super::types::Plugin;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// The Plugin Registry
///
/// The live catalog of plugins keyed by id. Handles:
/// - Validation on registration
/// - Load/unload hooks (failures are logged, never returned)
/// - Snapshot reads for the matcher
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = PluginRegistry::new();
/// registry.register(plugin).await?;
///
/// let matches = PluginMatcher::new().match_query("fy hello", &registry.get_enabled());
/// ```
pub struct PluginRegistry {
    /// Registered plugins by id
    plugins: HashMap<String, Arc<Plugin>>,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a plugin
    ///
    /// This will:
    /// 1. Validate the plugin (errors are returned)
    /// 2. Run the load hook, if any (a failure abandons registration)
    /// 3. Insert the plugin, replacing any plugin with the same id
    pub async fn register(&mut self, plugin: Plugin) -> PluginResult<()> {
        info!("Registering plugin '{}'", plugin.name());

        plugin.validate()?;
        if run_load_hook(&plugin).await {
            self.insert(plugin);
        }
        Ok(())
    }

    /// Unregister a plugin
    ///
    /// Runs the unload hook; the plugin is removed even if the hook fails.
    /// Returns the removed plugin, or `None` if the id was unknown.
    pub async fn unregister(&mut self, plugin_id: &str) -> Option<Arc<Plugin>> {
        let Some(plugin) = self.plugins.get(plugin_id).cloned() else {
            warn!("Plugin '{}' not found", plugin_id);
            return None;
        };

        run_unload_hook(&plugin).await;
        self.remove(&plugin)
    }

    fn insert(&mut self, plugin: Plugin) {
        let plugin_id = plugin.id().to_string();
        if self.plugins.contains_key(&plugin_id) {
            warn!("Plugin '{}' already registered, overwriting", plugin_id);
        }

        info!("Plugin '{}' registered successfully", plugin.name());
        self.plugins.insert(plugin_id, Arc::new(plugin));
    }

    fn remove(&mut self, plugin: &Plugin) -> Option<Arc<Plugin>> {
        let removed = self.plugins.remove(plugin.id());
        if removed.is_some() {
            info!("Plugin '{}' unregistered", plugin.name());
        }
        removed
    }

    /// Get a plugin by id
    pub fn get(&self, plugin_id: &str) -> Option<Arc<Plugin>> {
        self.plugins.get(plugin_id).cloned()
    }

    /// Check whether a plugin is registered
    pub fn has(&self, plugin_id: &str) -> bool {
        self.plugins.contains_key(plugin_id)
    }

    /// Snapshot of all registered plugins, in no particular order
    pub fn get_all(&self) -> Vec<Arc<Plugin>> {
        self.plugins.values().cloned().collect()
    }

    /// Snapshot of enabled plugins; this is what the matcher should be given
    pub fn get_enabled(&self) -> Vec<Arc<Plugin>> {
        self.plugins
            .values()
            .filter(|p| p.is_enabled())
            .cloned()
            .collect()
    }

    /// List all registered plugin ids
    pub fn plugin_ids(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    /// Enable or disable a plugin without running any hooks
    pub fn set_enabled(&mut self, plugin_id: &str, enabled: bool) -> PluginResult<()> {
        let plugin = self
            .plugins
            .get_mut(plugin_id)
            .ok_or_else(|| PluginError::NotFound(plugin_id.to_string()))?;

        *plugin = Arc::new(plugin.with_enabled(enabled));
        info!(
            "{} plugin '{}'",
            if enabled { "Enabled" } else { "Disabled" },
            plugin_id
        );
        Ok(())
    }

    /// Unregister every plugin (running unload hooks), then empty the catalog
    pub async fn clear(&mut self) {
        for plugin_id in self.plugin_ids() {
            self.unregister(&plugin_id).await;
        }

        self.plugins.clear();
        info!("All plugins cleared");
    }

    /// Number of registered plugins, enabled or not
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Run the load hook; false if it failed and registration should stop.
async fn run_load_hook(plugin: &Plugin) -> bool {
    let Some(hook) = &plugin.on_load else {
        return true;
    };

    match hook.run().await {
        Ok(()) => true,
        Err(e) => {
            let err = PluginError::LifecycleHook {
                plugin: plugin.id().to_string(),
                phase: HookPhase::Load,
                reason: e.to_string(),
            };
            error!("{}", err);
            false
        }
    }
}

/// Run the unload hook, logging any failure.
async fn run_unload_hook(plugin: &Plugin) {
    let Some(hook) = &plugin.on_unload else {
        return;
    };

    if let Err(e) = hook.run().await {
        let err = PluginError::LifecycleHook {
            plugin: plugin.id().to_string(),
            phase: HookPhase::Unload,
            reason: e.to_string(),
        };
        error!("{}", err);
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle to one application-wide registry.
///
/// Hooks run without the lock held, so a hook may read the registry and
/// slow hooks never stall readers. Only the insert or remove takes the
/// write lock. Reads hand out owned snapshots, so a reader never observes
/// a catalog halfway through a mutation.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<PluginRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin; see [`PluginRegistry::register`].
    pub async fn register(&self, plugin: Plugin) -> PluginResult<()> {
        info!("Registering plugin '{}'", plugin.name());

        plugin.validate()?;
        if run_load_hook(&plugin).await {
            self.inner.write().await.insert(plugin);
        }
        Ok(())
    }

    /// Unregister a plugin; see [`PluginRegistry::unregister`].
    ///
    /// Returns `None` if the entry was already gone once the hook finished.
    pub async fn unregister(&self, plugin_id: &str) -> Option<Arc<Plugin>> {
        let Some(plugin) = self.get(plugin_id).await else {
            warn!("Plugin '{}' not found", plugin_id);
            return None;
        };

        run_unload_hook(&plugin).await;
        self.inner.write().await.remove(&plugin)
    }

    pub async fn set_enabled(&self, plugin_id: &str, enabled: bool) -> PluginResult<()> {
        self.inner.write().await.set_enabled(plugin_id, enabled)
    }

    pub async fn clear(&self) {
        let plugin_ids = self.inner.read().await.plugin_ids();
        for plugin_id in plugin_ids {
            self.unregister(&plugin_id).await;
        }

        self.inner.write().await.plugins.clear();
        info!("All plugins cleared");
    }

    pub async fn get(&self, plugin_id: &str) -> Option<Arc<Plugin>> {
        self.inner.read().await.get(plugin_id)
    }

    pub async fn has(&self, plugin_id: &str) -> bool {
        self.inner.read().await.has(plugin_id)
    }

    pub async fn get_all(&self) -> Vec<Arc<Plugin>> {
        self.inner.read().await.get_all()
    }

    pub async fn get_enabled(&self) -> Vec<Arc<Plugin>> {
        self.inner.read().await.get_enabled()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl From<PluginRegistry> for SharedRegistry {
    fn from(registry: PluginRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }
}
