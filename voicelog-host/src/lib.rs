//! Voice Log Host Contracts
//!
//! Everything the voice log needs from the chat client it runs inside:
//!
//! - **Identifiers**: `UserId`, `ChannelId`, `GuildId`
//! - **Events**: raw `VoiceStateEvent`s delivered in `VoiceStateBatch`es
//! - **Directory**: user / channel / guild lookups and guild channel groups
//! - **Session**: the local user, selected voice channel and viewed channel
//! - **Messaging**: the `MessageSink` send API
//! - **Diagnostics**: structured reports in place of surfaced errors
//! - **Plugin**: lifecycle, settings schema and the voice-state subscription
//!
//! # Architecture
//!
//! ```text
//! Host runtime ──VoiceStateBatch──▶ Plugin
//!      ▲                              │
//!      ├──── Directory / Session ◀────┤ (lookups)
//!      └──── MessageSink ◀────────────┘ (notifications)
//! ```
//!
//! `MemoryHost` implements all of it in memory for tests and replays.

pub mod error;
pub mod ids;
pub mod memory;
pub mod model;
pub mod plugin;
pub mod services;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{PluginError, SendError};
pub use ids::{ChannelId, GuildId, UserId};
pub use memory::{CollectingDiagnostics, HostSnapshot, MemoryHost, SentMessage};
pub use model::{
    ChannelKind, ChannelRecord, GuildChannelGroups, GuildRecord, MessageAuthor, OutgoingMessage,
    UserRecord, VoiceStateBatch, VoiceStateEvent,
};
pub use plugin::{Plugin, PluginRegistry, SettingDescriptor, SettingKind, SettingValue};
pub use services::{Diagnostic, Diagnostics, Directory, LookupMiss, MessageSink, Session};
