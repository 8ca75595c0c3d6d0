//! Event classifier - turns one raw voice-state event into semantic events
//!
//! Classification is a pure function of the event, the subject's previous
//! snapshot and the effective old channel. Field diffs are evaluated in a
//! fixed order, which is also the order notifications are sent in:
//!
//! 1. self mute
//! 2. self deafen
//! 3. camera
//! 4. stream
//! 5. server mute, only while self mute is unchanged
//! 6. server deafen, only while self deafen is unchanged
//! 7. channel membership (connect / disconnect / move)
//!
//! Steps 1-6 need a previous snapshot. A move yields two events sharing the
//! `Moved` kind, one addressed to each channel.

use voicelog_host::{ChannelId, UserId, VoiceStateEvent};

use crate::snapshot::PreviousVoiceState;

/// Semantic event types
///
/// `Joined`, `Left` and `Default` have settings but are never produced by
/// `classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Joined,
    Left,
    Connected,
    Disconnected,
    Moved,
    Default,
    Muted,
    Unmuted,
    Deafened,
    Undeafened,
    CameraOn,
    CameraOff,
    StreamStart,
    StreamStop,
    ServerMuted,
    ServerUnmuted,
    ServerDeafened,
    ServerUndeafened,
}

impl EventKind {
    /// Every kind, in settings order
    pub const ALL: [EventKind; 18] = [
        EventKind::Joined,
        EventKind::Left,
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::Moved,
        EventKind::Default,
        EventKind::Muted,
        EventKind::Unmuted,
        EventKind::Deafened,
        EventKind::Undeafened,
        EventKind::CameraOn,
        EventKind::CameraOff,
        EventKind::StreamStart,
        EventKind::StreamStop,
        EventKind::ServerMuted,
        EventKind::ServerUnmuted,
        EventKind::ServerDeafened,
        EventKind::ServerUndeafened,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Joined => "join",
            EventKind::Left => "leave",
            EventKind::Connected => "connect",
            EventKind::Disconnected => "disconnect",
            EventKind::Moved => "move",
            EventKind::Default => "default",
            EventKind::Muted => "muted",
            EventKind::Unmuted => "unmuted",
            EventKind::Deafened => "deafened",
            EventKind::Undeafened => "undeafened",
            EventKind::CameraOn => "camera_on",
            EventKind::CameraOff => "camera_off",
            EventKind::StreamStart => "stream_start",
            EventKind::StreamStop => "stream_stop",
            EventKind::ServerMuted => "server_muted",
            EventKind::ServerUnmuted => "server_unmuted",
            EventKind::ServerDeafened => "server_deafened",
            EventKind::ServerUndeafened => "server_undeafened",
        }
    }

    /// Whether `classify` can ever produce this kind
    pub fn is_reachable(self) -> bool {
        !matches!(self, EventKind::Joined | EventKind::Left | EventKind::Default)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel membership transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    Connect { to: ChannelId },
    Disconnect { from: ChannelId },
    Move { from: ChannelId, to: ChannelId },
}

/// Compare the effective old channel with the new one
///
/// Equal channels, including both absent, are no transition.
pub fn classify_membership(
    old_channel_id: Option<&ChannelId>,
    new_channel_id: Option<&ChannelId>,
) -> Option<MembershipChange> {
    match (old_channel_id, new_channel_id) {
        (None, Some(to)) => Some(MembershipChange::Connect { to: to.clone() }),
        (Some(from), None) => Some(MembershipChange::Disconnect { from: from.clone() }),
        (Some(from), Some(to)) if from != to => Some(MembershipChange::Move {
            from: from.clone(),
            to: to.clone(),
        }),
        _ => None,
    }
}

/// A classified event, ready for routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticEvent {
    pub kind: EventKind,
    pub user_id: UserId,
    /// Effective old channel
    pub old_channel_id: Option<ChannelId>,
    pub new_channel_id: Option<ChannelId>,
    /// Voice channel whose associated text channel receives the notification
    pub voice_channel_id: ChannelId,
}

/// Classify one event
///
/// `old_channel_id` is the effective old channel: the host's value, or the
/// tracker-corrected one for the local user.
pub fn classify(
    event: &VoiceStateEvent,
    previous: Option<&PreviousVoiceState>,
    old_channel_id: Option<&ChannelId>,
) -> Vec<SemanticEvent> {
    let new_channel_id = event.channel_id.as_ref();
    let mut kinds = Vec::new();

    if let Some(prev) = previous {
        if prev.self_mute != event.self_mute {
            kinds.push(pick(event.self_mute, EventKind::Muted, EventKind::Unmuted));
        }

        if prev.self_deaf != event.self_deaf {
            kinds.push(pick(event.self_deaf, EventKind::Deafened, EventKind::Undeafened));
        }

        if prev.self_video != event.self_video {
            kinds.push(pick(
                event.self_video.unwrap_or(false),
                EventKind::CameraOn,
                EventKind::CameraOff,
            ));
        }

        if prev.self_stream != event.self_stream {
            kinds.push(pick(
                event.self_stream.unwrap_or(false),
                EventKind::StreamStart,
                EventKind::StreamStop,
            ));
        }

        // A self-mute toggling in the same update masks the server flag
        if prev.mute != event.mute && prev.self_mute == event.self_mute {
            kinds.push(pick(event.mute, EventKind::ServerMuted, EventKind::ServerUnmuted));
        }

        if prev.deaf != event.deaf && prev.self_deaf == event.self_deaf {
            kinds.push(pick(
                event.deaf,
                EventKind::ServerDeafened,
                EventKind::ServerUndeafened,
            ));
        }
    }

    let make = |kind: EventKind, voice_channel_id: ChannelId| SemanticEvent {
        kind,
        user_id: event.user_id.clone(),
        old_channel_id: old_channel_id.cloned(),
        new_channel_id: new_channel_id.cloned(),
        voice_channel_id,
    };

    let mut events = Vec::new();

    // Field diffs go to the channel the user is in, or just left
    if let Some(address) = new_channel_id.or(old_channel_id) {
        events.extend(kinds.into_iter().map(|kind| make(kind, address.clone())));
    }

    match classify_membership(old_channel_id, new_channel_id) {
        Some(MembershipChange::Connect { to }) => events.push(make(EventKind::Connected, to)),
        Some(MembershipChange::Disconnect { from }) => {
            events.push(make(EventKind::Disconnected, from))
        }
        Some(MembershipChange::Move { from, to }) => {
            events.push(make(EventKind::Moved, from));
            events.push(make(EventKind::Moved, to));
        }
        None => {}
    }

    events
}

fn pick(on: bool, when_on: EventKind, when_off: EventKind) -> EventKind {
    if on {
        when_on
    } else {
        when_off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn event_in(channel: Option<&str>, old: Option<&str>) -> VoiceStateEvent {
        let mut event = VoiceStateEvent::new("42");
        event.channel_id = channel.map(ChannelId::new);
        event.old_channel_id = old.map(ChannelId::new);
        event
    }

    fn kinds(events: &[SemanticEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_connect() {
        let event = event_in(Some("100"), None);
        let events = classify(&event, None, None);

        assert_eq!(kinds(&events), vec![EventKind::Connected]);
        assert_eq!(events[0].voice_channel_id, ChannelId::new("100"));
    }

    #[test]
    fn test_disconnect() {
        let event = event_in(None, Some("100"));
        let old = ChannelId::new("100");
        let events = classify(&event, None, Some(&old));

        assert_eq!(kinds(&events), vec![EventKind::Disconnected]);
        assert_eq!(events[0].voice_channel_id, old);
    }

    #[test]
    fn test_move_addresses_both_channels() {
        let event = event_in(Some("200"), Some("100"));
        let old = ChannelId::new("100");
        let events = classify(&event, None, Some(&old));

        assert_eq!(kinds(&events), vec![EventKind::Moved, EventKind::Moved]);
        assert_eq!(events[0].voice_channel_id, ChannelId::new("100"));
        assert_eq!(events[1].voice_channel_id, ChannelId::new("200"));
        assert!(events
            .iter()
            .all(|e| e.old_channel_id == Some(old.clone())
                && e.new_channel_id == Some(ChannelId::new("200"))));
    }

    #[test]
    fn test_same_channel_is_no_membership_change() {
        let event = event_in(Some("100"), Some("100"));
        let old = ChannelId::new("100");
        assert!(classify(&event, None, Some(&old)).is_empty());
        assert!(classify(&event_in(None, None), None, None).is_empty());
    }

    #[test]
    fn test_field_diffs_need_previous_snapshot() {
        let mut event = event_in(Some("100"), Some("100"));
        event.self_mute = true;
        event.self_deaf = true;
        let old = ChannelId::new("100");

        assert!(classify(&event, None, Some(&old)).is_empty());
    }

    #[rstest]
    #[case::mute(|e: &mut VoiceStateEvent| e.self_mute = true, EventKind::Muted)]
    #[case::deafen(|e: &mut VoiceStateEvent| e.self_deaf = true, EventKind::Deafened)]
    #[case::camera_on(|e: &mut VoiceStateEvent| e.self_video = Some(true), EventKind::CameraOn)]
    #[case::stream_start(|e: &mut VoiceStateEvent| e.self_stream = Some(true), EventKind::StreamStart)]
    #[case::server_mute(|e: &mut VoiceStateEvent| e.mute = true, EventKind::ServerMuted)]
    #[case::server_deafen(|e: &mut VoiceStateEvent| e.deaf = true, EventKind::ServerDeafened)]
    fn test_single_field_turned_on(
        #[case] apply: fn(&mut VoiceStateEvent),
        #[case] expected: EventKind,
    ) {
        let mut event = event_in(Some("100"), Some("100"));
        apply(&mut event);
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&PreviousVoiceState::default()), Some(&old));
        assert_eq!(kinds(&events), vec![expected]);
        assert_eq!(events[0].voice_channel_id, ChannelId::new("100"));
    }

    #[rstest]
    #[case::unmute(|p: &mut PreviousVoiceState| p.self_mute = true, EventKind::Unmuted)]
    #[case::undeafen(|p: &mut PreviousVoiceState| p.self_deaf = true, EventKind::Undeafened)]
    #[case::camera_off(|p: &mut PreviousVoiceState| p.self_video = Some(true), EventKind::CameraOff)]
    #[case::stream_stop(|p: &mut PreviousVoiceState| p.self_stream = Some(true), EventKind::StreamStop)]
    #[case::server_unmute(|p: &mut PreviousVoiceState| p.mute = true, EventKind::ServerUnmuted)]
    #[case::server_undeafen(|p: &mut PreviousVoiceState| p.deaf = true, EventKind::ServerUndeafened)]
    fn test_single_field_turned_off(
        #[case] apply: fn(&mut PreviousVoiceState),
        #[case] expected: EventKind,
    ) {
        let event = event_in(Some("100"), Some("100"));
        let mut previous = PreviousVoiceState::default();
        apply(&mut previous);
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&previous), Some(&old));
        assert_eq!(kinds(&events), vec![expected]);
    }

    #[test]
    fn test_camera_some_false_to_none_is_a_change() {
        let event = event_in(Some("100"), Some("100"));
        let previous = PreviousVoiceState {
            self_video: Some(false),
            ..Default::default()
        };
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&previous), Some(&old));
        assert_eq!(kinds(&events), vec![EventKind::CameraOff]);
    }

    #[test]
    fn test_server_mute_masked_by_self_mute() {
        let mut event = event_in(Some("100"), Some("100"));
        event.self_mute = true;
        event.mute = true;
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&PreviousVoiceState::default()), Some(&old));
        assert_eq!(kinds(&events), vec![EventKind::Muted]);
    }

    #[test]
    fn test_server_deafen_masked_by_self_deafen() {
        let mut event = event_in(Some("100"), Some("100"));
        event.self_deaf = true;
        event.deaf = true;
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&PreviousVoiceState::default()), Some(&old));
        assert_eq!(kinds(&events), vec![EventKind::Deafened]);
    }

    #[test]
    fn test_fixed_order_with_membership_last() {
        let mut event = event_in(Some("200"), Some("100"));
        event.self_mute = true;
        event.self_deaf = true;
        event.self_video = Some(true);
        event.self_stream = Some(true);
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&PreviousVoiceState::default()), Some(&old));
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::Muted,
                EventKind::Deafened,
                EventKind::CameraOn,
                EventKind::StreamStart,
                EventKind::Moved,
                EventKind::Moved,
            ]
        );
        // Field diffs go to the new channel
        assert_eq!(events[0].voice_channel_id, ChannelId::new("200"));
    }

    #[test]
    fn test_field_diff_on_disconnect_goes_to_old_channel() {
        let mut event = event_in(None, Some("100"));
        event.self_mute = false;
        let previous = PreviousVoiceState {
            self_mute: true,
            ..Default::default()
        };
        let old = ChannelId::new("100");

        let events = classify(&event, Some(&previous), Some(&old));
        assert_eq!(kinds(&events), vec![EventKind::Unmuted, EventKind::Disconnected]);
        assert!(events.iter().all(|e| e.voice_channel_id == old));
    }

    #[test]
    fn test_unreachable_kinds() {
        let reachable: Vec<_> = EventKind::ALL.iter().filter(|k| k.is_reachable()).collect();
        assert_eq!(reachable.len(), 15);
        assert!(!EventKind::Joined.is_reachable());
        assert!(!EventKind::Left.is_reachable());
        assert!(!EventKind::Default.is_reachable());
    }

    #[test]
    fn test_classify_membership() {
        let a = ChannelId::new("a");
        let b = ChannelId::new("b");

        assert_eq!(classify_membership(None, None), None);
        assert_eq!(classify_membership(Some(&a), Some(&a)), None);
        assert_eq!(
            classify_membership(None, Some(&a)),
            Some(MembershipChange::Connect { to: a.clone() })
        );
        assert_eq!(
            classify_membership(Some(&a), None),
            Some(MembershipChange::Disconnect { from: a.clone() })
        );
        assert_eq!(
            classify_membership(Some(&a), Some(&b)),
            Some(MembershipChange::Move { from: a, to: b })
        );
    }
}
