//! Per-user voice flags remembered between events

use state_store::Snapshot;
use voicelog_host::VoiceStateEvent;

/// The flags of a user's last processed voice-state event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviousVoiceState {
    pub deaf: bool,
    pub mute: bool,
    pub self_deaf: bool,
    pub self_mute: bool,
    pub self_video: Option<bool>,
    pub self_stream: Option<bool>,
}

impl Snapshot for PreviousVoiceState {
    const KIND: &'static str = "voice_state";
}

impl From<&VoiceStateEvent> for PreviousVoiceState {
    fn from(event: &VoiceStateEvent) -> Self {
        Self {
            deaf: event.deaf,
            mute: event.mute,
            self_deaf: event.self_deaf,
            self_mute: event.self_mute,
            self_video: event.self_video,
            self_stream: event.self_stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_event_copies_every_flag() {
        let mut event = VoiceStateEvent::new("42");
        event.deaf = true;
        event.self_mute = true;
        event.self_stream = Some(true);

        let snapshot = PreviousVoiceState::from(&event);
        assert!(snapshot.deaf);
        assert!(!snapshot.mute);
        assert!(!snapshot.self_deaf);
        assert!(snapshot.self_mute);
        assert_eq!(snapshot.self_video, None);
        assert_eq!(snapshot.self_stream, Some(true));
    }
}
