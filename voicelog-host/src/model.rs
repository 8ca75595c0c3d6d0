//! Records exchanged with the host
//!
//! Everything here is read-only data owned by the host: raw voice-state
//! events, directory records and the outgoing message envelope.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, UserId};

/// One raw voice-state change as delivered by the host
///
/// `old_channel_id` is whatever the host reports and may be stale for the
/// local user across consecutive updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceStateEvent {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_channel_id: Option<ChannelId>,
    /// Server-imposed deafen
    #[serde(default)]
    pub deaf: bool,
    /// Server-imposed mute
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_video: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_stream: Option<bool>,
}

impl VoiceStateEvent {
    /// Create an event with every flag cleared
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: None,
            old_channel_id: None,
            deaf: false,
            mute: false,
            self_deaf: false,
            self_mute: false,
            self_video: None,
            self_stream: None,
        }
    }

    /// The channel this event is about: the new channel, or the old one
    /// when the user left voice.
    pub fn current_channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref().or(self.old_channel_id.as_ref())
    }
}

/// A batch of voice-state changes, in host delivery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceStateBatch {
    pub voice_states: Vec<VoiceStateEvent>,
}

impl VoiceStateBatch {
    pub fn new(voice_states: Vec<VoiceStateEvent>) -> Self {
        Self { voice_states }
    }
}

/// Host channel type
///
/// Serialized as the host's numeric channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    GuildStageVoice,
    Other(u8),
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => ChannelKind::GuildText,
            1 => ChannelKind::Dm,
            2 => ChannelKind::GuildVoice,
            3 => ChannelKind::GroupDm,
            4 => ChannelKind::GuildCategory,
            5 => ChannelKind::GuildAnnouncement,
            13 => ChannelKind::GuildStageVoice,
            other => ChannelKind::Other(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::GuildText => 0,
            ChannelKind::Dm => 1,
            ChannelKind::GuildVoice => 2,
            ChannelKind::GroupDm => 3,
            ChannelKind::GuildCategory => 4,
            ChannelKind::GuildAnnouncement => 5,
            ChannelKind::GuildStageVoice => 13,
            ChannelKind::Other(value) => value,
        }
    }
}

impl ChannelKind {
    pub fn is_voice(self) -> bool {
        matches!(self, ChannelKind::GuildVoice | ChannelKind::GuildStageVoice)
    }

    pub fn is_stage(self) -> bool {
        matches!(self, ChannelKind::GuildStageVoice)
    }

    pub fn is_text(self) -> bool {
        matches!(self, ChannelKind::GuildText)
    }

    /// Whether messages can be posted into channels of this kind
    pub fn is_text_capable(self) -> bool {
        matches!(self, ChannelKind::GuildText | ChannelKind::GuildAnnouncement)
    }

    pub fn is_private(self) -> bool {
        matches!(self, ChannelKind::Dm | ChannelKind::GroupDm)
    }
}

/// Channel directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default, alias = "guild_id", skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ChannelId>,
}

impl ChannelRecord {
    pub fn is_voice(&self) -> bool {
        self.kind.is_voice()
    }

    pub fn is_stage(&self) -> bool {
        self.kind.is_stage()
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    /// Guild channels belong to a guild and are not DMs
    pub fn is_guild(&self) -> bool {
        self.guild_id.is_some() && !self.kind.is_private()
    }
}

/// Guild directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRecord {
    pub id: GuildId,
    pub name: String,
}

/// User directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserRecord {
    /// Global display name, or the username when none is set
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// A guild's channel list as grouped by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildChannelGroups {
    /// Channels the local user can select (text, announcement, ...)
    #[serde(default)]
    pub selectable: Vec<ChannelRecord>,
    /// Voice and stage channels
    #[serde(default)]
    pub vocal: Vec<ChannelRecord>,
}

/// Author override shown on a locally posted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Message handed to the host's send API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<MessageAuthor>,
}
