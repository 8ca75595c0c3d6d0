//! State tracker
//!
//! Holds the previous voice-state snapshot of every user seen so far and the
//! local user's last known voice channel. The tracker is an ordinary owned
//! value: whoever processes events owns it and passes `&mut` access down.
//!
//! Callers query a user's snapshot before classifying an event and record
//! the new snapshot only after every notification for that event has been
//! dispatched.

use state_store::{Replaced, SnapshotStore};
use voicelog_host::{ChannelId, UserId, VoiceStateEvent};

use crate::snapshot::PreviousVoiceState;

/// Previous snapshots plus the local voice position
#[derive(Debug, Default)]
pub struct VoiceStateTracker {
    snapshots: SnapshotStore<UserId, PreviousVoiceState>,
    /// Last voice channel the local user was seen in
    last_voice_channel: Option<ChannelId>,
}

impl VoiceStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous snapshot for a user, if one was ever recorded
    pub fn get(&self, user_id: &UserId) -> Option<&PreviousVoiceState> {
        self.snapshots.get(user_id)
    }

    /// Overwrite a user's snapshot
    pub fn set(&mut self, user_id: UserId, state: PreviousVoiceState) -> Replaced {
        self.snapshots.set(user_id, state)
    }

    /// Overwrite the subject's snapshot with the flags of `event`
    pub fn record(&mut self, event: &VoiceStateEvent) -> Replaced {
        let replaced = self.set(event.user_id.clone(), PreviousVoiceState::from(event));
        tracing::trace!(user_id = %event.user_id, ?replaced, "recorded voice state snapshot");
        replaced
    }

    /// Effective old channel for an event about the local user
    ///
    /// The host's `old_channel_id` is unreliable for self-events. When the
    /// event's channel differs from the remembered one, the remembered
    /// channel becomes the old channel and the event's channel is remembered
    /// instead. Otherwise the host's value is kept.
    pub fn correct_old_channel(&mut self, event: &VoiceStateEvent) -> Option<ChannelId> {
        if event.channel_id != self.last_voice_channel {
            std::mem::replace(&mut self.last_voice_channel, event.channel_id.clone())
        } else {
            event.old_channel_id.clone()
        }
    }

    pub fn last_voice_channel(&self) -> Option<&ChannelId> {
        self.last_voice_channel.as_ref()
    }

    /// Number of users with a snapshot
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
