//! Voice Channel Logs
//!
//! Watches a chat client's voice-state events and posts a templated notice
//! into the text channel associated with each voice channel whenever
//! someone connects, disconnects, moves, mutes, deafens, turns their camera
//! on or off, or starts and stops streaming.
//!
//! # Features
//!
//! - **Per-event toggles and templates**: every event kind can be switched
//!   off or reworded independently
//! - **Own-channel monitoring**: optionally only report what happens in your
//!   voice channel, the channel you are viewing, or allowlisted guilds
//! - **Associated text channel**: notices land in the text channel sharing
//!   the voice channel's name and category
//! - **Never fails the host**: lookup misses and send failures become
//!   diagnostics, not errors
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use voicelog_host::{CollectingDiagnostics, MemoryHost, Plugin};
//! use voicelog_sdk::{HostServices, Settings, VoiceLog};
//!
//! let host = Arc::new(MemoryHost::new());
//! let services = HostServices::from_host(host, Arc::new(CollectingDiagnostics::new()));
//!
//! let mut plugin = VoiceLog::new(Settings::default(), services);
//! plugin.start().await?;
//! plugin.on_voice_state_updates(batch).await;
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────── VoiceLog (Plugin) ─────────────────────────┐
//! │                                                                     │
//! │  VoiceStateBatch ──▶ VoiceLogRouter ──▶ classify ──▶ render ──▶ send │
//! │                          │    ▲                                      │
//! │                          ▼    │                                      │
//! │                    VoiceStateTracker       resolve_text_channel      │
//! └─────────────────────────────────────────────────────────────────────┘
//!         │ Directory / Session            │ MessageSink / Diagnostics
//!         ▼                                ▼
//!                         Host runtime
//! ```

pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod resolver;
pub mod router;
pub mod settings;
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use diagnostics::TracingDiagnostics;
pub use error::{Result, SdkError, SettingsError};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use plugin::{VoiceLog, PLUGIN_DESCRIPTION, PLUGIN_NAME};
pub use resolver::resolve_text_channel;
pub use router::{EventOutcome, HostServices, VoiceLogRouter};
pub use settings::{default_template, Settings};
pub use template::{format_now, render, Clock, FixedClock, Placeholder, SystemClock, TemplateContext};

// Types that appear in this crate's public API
pub use voicelog_state::{EventKind, SemanticEvent, VoiceStateTracker};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::plugin::VoiceLog;
    pub use crate::router::{EventOutcome, HostServices};
    pub use crate::settings::Settings;
    pub use crate::EventKind;
}
