//! In-memory host
//!
//! `MemoryHost` implements every host collaborator over plain maps. It backs
//! the test suites and the replay driver, which loads it from a JSON
//! `HostSnapshot`.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::SendError;
use crate::ids::{ChannelId, GuildId, UserId};
use crate::model::{
    ChannelRecord, GuildChannelGroups, GuildRecord, OutgoingMessage, UserRecord,
};
use crate::services::{Diagnostic, Diagnostics, Directory, MessageSink, Session};

/// A message accepted by `MemoryHost`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub message: OutgoingMessage,
}

/// Serializable description of a host's directory and session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    #[serde(default)]
    pub current_user_id: Option<UserId>,
    #[serde(default)]
    pub selected_voice_channel_id: Option<ChannelId>,
    #[serde(default)]
    pub viewed_channel_id: Option<ChannelId>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub guilds: Vec<GuildRecord>,
    #[serde(default)]
    pub channels: Vec<ChannelRecord>,
}

#[derive(Default)]
struct SessionState {
    current_user_id: Option<UserId>,
    selected_voice_channel_id: Option<ChannelId>,
    viewed_channel_id: Option<ChannelId>,
}

/// Host backed by in-memory maps
///
/// Channels keep their insertion order, which is the order guild channel
/// groups are enumerated in.
#[derive(Default)]
pub struct MemoryHost {
    users: HashMap<UserId, UserRecord>,
    guilds: HashMap<GuildId, GuildRecord>,
    channels: Vec<ChannelRecord>,
    session: RwLock<SessionState>,
    failing_channels: RwLock<HashSet<ChannelId>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a host from a snapshot
    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let mut host = Self::new();
        for user in snapshot.users {
            host = host.with_user(user);
        }
        for guild in snapshot.guilds {
            host = host.with_guild(guild);
        }
        for channel in snapshot.channels {
            host = host.with_channel(channel);
        }
        {
            let mut session = host.session.write();
            session.current_user_id = snapshot.current_user_id;
            session.selected_voice_channel_id = snapshot.selected_voice_channel_id;
            session.viewed_channel_id = snapshot.viewed_channel_id;
        }
        host
    }

    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn with_guild(mut self, guild: GuildRecord) -> Self {
        self.guilds.insert(guild.id.clone(), guild);
        self
    }

    /// Add or replace a channel
    pub fn with_channel(mut self, channel: ChannelRecord) -> Self {
        match self.channels.iter().position(|c| c.id == channel.id) {
            Some(index) => self.channels[index] = channel,
            None => self.channels.push(channel),
        }
        self
    }

    pub fn set_current_user(&self, user_id: Option<UserId>) {
        self.session.write().current_user_id = user_id;
    }

    pub fn select_voice_channel(&self, channel_id: Option<ChannelId>) {
        self.session.write().selected_voice_channel_id = channel_id;
    }

    pub fn view_channel(&self, channel_id: Option<ChannelId>) {
        self.session.write().viewed_channel_id = channel_id;
    }

    /// Make every send to `channel_id` fail
    pub fn fail_sends_to(&self, channel_id: ChannelId) {
        self.failing_channels.write().insert(channel_id);
    }

    /// Messages accepted so far, in send order
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Drain accepted messages
    pub fn take_sent(&self) -> Vec<SentMessage> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl Directory for MemoryHost {
    fn user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.get(user_id).cloned()
    }

    fn channel(&self, channel_id: &ChannelId) -> Option<ChannelRecord> {
        self.channels.iter().find(|c| &c.id == channel_id).cloned()
    }

    fn guild(&self, guild_id: &GuildId) -> Option<GuildRecord> {
        self.guilds.get(guild_id).cloned()
    }

    fn guild_channels(&self, guild_id: &GuildId) -> Option<GuildChannelGroups> {
        if !self.guilds.contains_key(guild_id) {
            return None;
        }

        let mut groups = GuildChannelGroups::default();
        for channel in self
            .channels
            .iter()
            .filter(|c| c.guild_id.as_ref() == Some(guild_id))
        {
            if channel.kind.is_voice() {
                groups.vocal.push(channel.clone());
            } else if channel.kind.is_text_capable() {
                groups.selectable.push(channel.clone());
            }
        }
        Some(groups)
    }
}

impl Session for MemoryHost {
    fn current_user_id(&self) -> Option<UserId> {
        self.session.read().current_user_id.clone()
    }

    fn selected_voice_channel_id(&self) -> Option<ChannelId> {
        self.session.read().selected_voice_channel_id.clone()
    }

    fn viewed_channel_id(&self) -> Option<ChannelId> {
        self.session.read().viewed_channel_id.clone()
    }
}

#[async_trait]
impl MessageSink for MemoryHost {
    async fn send(&self, channel_id: &ChannelId, message: OutgoingMessage) -> Result<(), SendError> {
        if self.failing_channels.read().contains(channel_id) {
            return Err(SendError::Rejected {
                channel_id: channel_id.clone(),
                reason: "simulated failure".to_string(),
            });
        }

        self.sent.lock().push(SentMessage {
            channel_id: channel_id.clone(),
            message,
        });
        Ok(())
    }
}

/// Diagnostics sink that keeps every report
#[derive(Default)]
pub struct CollectingDiagnostics {
    reports: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports.lock().clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.lock().push(diagnostic);
    }
}
