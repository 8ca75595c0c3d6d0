//! `VoiceLog`, the plugin the host registers

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use voicelog_host::{Plugin, PluginError, SettingDescriptor, VoiceStateBatch};

use crate::error::Result;
use crate::router::{EventOutcome, HostServices, VoiceLogRouter};
use crate::settings::Settings;
use crate::template::Clock;

pub const PLUGIN_NAME: &str = "VoiceChannelLogs";
pub const PLUGIN_DESCRIPTION: &str = "Logs voice channel joins/leaves to the associated text chat";

/// Voice channel logger plugin
///
/// Batches delivered while stopped are dropped.
pub struct VoiceLog {
    router: VoiceLogRouter,
    started: bool,
}

impl VoiceLog {
    pub fn new(settings: Settings, services: HostServices) -> Self {
        Self {
            router: VoiceLogRouter::new(settings, services),
            started: false,
        }
    }

    /// Load settings from a JSON file
    pub fn from_settings_path(path: impl AsRef<Path>, services: HostServices) -> Result<Self> {
        let settings = Settings::from_path(path)?;
        Ok(Self::new(settings, services))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.router = self.router.with_clock(clock);
        self
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn settings(&self) -> &Settings {
        self.router.settings()
    }

    /// Settings edited in the host UI apply from the next event
    pub fn update_settings(&mut self, settings: Settings) {
        tracing::debug!("voice log settings updated");
        self.router.set_settings(settings);
    }

    pub fn router(&self) -> &VoiceLogRouter {
        &self.router
    }

    /// Process a batch and report per-event outcomes
    pub async fn process(&mut self, batch: &VoiceStateBatch) -> Vec<EventOutcome> {
        if !self.started {
            tracing::debug!(events = batch.voice_states.len(), "voice log stopped, batch dropped");
            return Vec::new();
        }
        self.router.handle_batch(batch).await
    }
}

#[async_trait]
impl Plugin for VoiceLog {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    fn settings_schema(&self) -> Vec<SettingDescriptor> {
        Settings::schema()
    }

    async fn start(&mut self) -> std::result::Result<(), PluginError> {
        self.started = true;
        tracing::info!(enabled = self.settings().enabled, "voice log started");
        Ok(())
    }

    async fn stop(&mut self) -> std::result::Result<(), PluginError> {
        self.started = false;
        tracing::info!("voice log stopped");
        Ok(())
    }

    async fn on_voice_state_updates(&mut self, batch: VoiceStateBatch) {
        self.process(&batch).await;
    }
}
