//! Collaborator traits implemented by the host
//!
//! The voice log never owns channel, guild or user data. It reads them
//! through `Directory`, asks `Session` about the local user, posts through
//! `MessageSink` and surfaces failures through `Diagnostics`.

use async_trait::async_trait;

use crate::error::SendError;
use crate::ids::{ChannelId, GuildId, UserId};
use crate::model::{ChannelRecord, GuildChannelGroups, GuildRecord, OutgoingMessage, UserRecord};

/// Lookup of host entities by ID
///
/// Every lookup may miss; callers treat a miss as "skip this notification".
pub trait Directory: Send + Sync {
    fn user(&self, user_id: &UserId) -> Option<UserRecord>;

    fn channel(&self, channel_id: &ChannelId) -> Option<ChannelRecord>;

    fn guild(&self, guild_id: &GuildId) -> Option<GuildRecord>;

    /// The guild's channels grouped by selectability
    fn guild_channels(&self, guild_id: &GuildId) -> Option<GuildChannelGroups>;
}

/// Accessors for the local user's session
pub trait Session: Send + Sync {
    /// ID of the logged-in user
    fn current_user_id(&self) -> Option<UserId>;

    /// Voice channel the local user is connected to
    fn selected_voice_channel_id(&self) -> Option<ChannelId>;

    /// Channel currently open in the client
    fn viewed_channel_id(&self) -> Option<ChannelId>;
}

/// The host's message-send API
///
/// From the voice log's point of view sending is fire-and-forget: a returned
/// error is reported and dropped, never retried.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, channel_id: &ChannelId, message: OutgoingMessage) -> Result<(), SendError>;
}

/// What kind of lookup missed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    User(UserId),
    /// No text channel could be resolved for this voice channel
    TextChannel(ChannelId),
}

/// Structured diagnostic emitted instead of surfacing an error to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Raw event payload, reported only when console logging is enabled
    VoiceStateReceived { user_id: UserId, payload: String },

    /// Processing of one event was abandoned
    LookupMiss { user_id: UserId, miss: LookupMiss },

    /// The host failed to send a notification
    SendFailed {
        user_id: UserId,
        event: &'static str,
        channel_id: ChannelId,
        error: SendError,
    },
}

/// Sink for diagnostics
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}
