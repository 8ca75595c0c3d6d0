//! Plugin contract between the host runtime and an extension.
//!
//! An extension describes its settings schema, is started and stopped by the
//! host, and receives voice-state batches through a single subscription
//! point. A `PluginRegistry` drives any number of extensions the way a host's
//! module system would.

use async_trait::async_trait;

use crate::error::PluginError;
use crate::model::VoiceStateBatch;

/// Type of a setting as shown in the host's settings UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Boolean,
    String,
}

/// Default value of a setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Boolean(bool),
    String(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::String(_) => SettingKind::String,
        }
    }
}

/// One entry of a plugin's settings schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDescriptor {
    /// Persisted key
    pub key: &'static str,
    pub description: &'static str,
    pub default: SettingValue,
    /// Shown for reference only, edits are discarded
    pub read_only: bool,
}

impl SettingDescriptor {
    pub fn boolean(key: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            key,
            description,
            default: SettingValue::Boolean(default),
            read_only: false,
        }
    }

    pub fn string(key: &'static str, description: &'static str, default: impl Into<String>) -> Self {
        Self {
            key,
            description,
            default: SettingValue::String(default.into()),
            read_only: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn kind(&self) -> SettingKind {
        self.default.kind()
    }
}

/// Trait implemented by host extensions.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Get the name of this plugin.
    fn name(&self) -> &'static str;

    /// One-line description shown by the host.
    fn description(&self) -> &'static str;

    /// Settings schema registered with the host's settings subsystem.
    fn settings_schema(&self) -> Vec<SettingDescriptor>;

    /// Called once when the host enables the plugin.
    async fn start(&mut self) -> Result<(), PluginError>;

    /// Called once when the host disables the plugin.
    async fn stop(&mut self) -> Result<(), PluginError>;

    /// Voice-state subscription point. No acknowledgement, no backpressure.
    async fn on_voice_state_updates(&mut self, batch: VoiceStateBatch);
}

/// Registry driving registered plugins through their lifecycle.
pub struct PluginRegistry {
    /// Collection of registered plugins
    plugins: Vec<Box<dyn Plugin>>,
    /// Whether plugins have been started
    started: bool,
}

impl PluginRegistry {
    /// Create a new empty plugin registry.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            started: false,
        }
    }

    /// Register a plugin. Plugins are started in registration order.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start all registered plugins.
    ///
    /// A plugin that fails to start is logged and skipped; the remaining
    /// plugins are still started.
    pub async fn start_all(&mut self) {
        if self.started {
            return;
        }

        for plugin in &mut self.plugins {
            match plugin.start().await {
                Ok(()) => tracing::info!(plugin = plugin.name(), "plugin started"),
                Err(e) => tracing::warn!(plugin = plugin.name(), error = %e, "plugin failed to start"),
            }
        }

        self.started = true;
    }

    /// Stop all registered plugins in reverse order.
    pub async fn stop_all(&mut self) {
        if !self.started {
            return;
        }

        for plugin in self.plugins.iter_mut().rev() {
            match plugin.stop().await {
                Ok(()) => tracing::info!(plugin = plugin.name(), "plugin stopped"),
                Err(e) => tracing::warn!(plugin = plugin.name(), error = %e, "plugin failed to stop"),
            }
        }

        self.started = false;
    }

    /// Deliver a voice-state batch to every plugin, in registration order.
    ///
    /// Batches are dropped while the registry is stopped.
    pub async fn dispatch_voice_state_updates(&mut self, batch: &VoiceStateBatch) {
        if !self.started {
            tracing::debug!("registry stopped, dropping voice state batch");
            return;
        }

        for plugin in &mut self.plugins {
            plugin.on_voice_state_updates(batch.clone()).await;
        }
    }

    /// Settings schemas of all plugins, keyed by plugin name.
    pub fn schemas(&self) -> Vec<(&'static str, Vec<SettingDescriptor>)> {
        self.plugins
            .iter()
            .map(|plugin| (plugin.name(), plugin.settings_schema()))
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
