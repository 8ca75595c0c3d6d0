//! Property-based tests for voice-state classification
//!
//! Covers channel membership cardinalities, repeat idempotence and the
//! local-user channel correction.

use proptest::prelude::*;

use voicelog_host::{ChannelId, VoiceStateEvent};
use voicelog_state::{classify, EventKind, PreviousVoiceState, VoiceStateTracker};

// ============================================================================
// Test Helpers
// ============================================================================

/// Strategy for snowflake-like IDs
fn id_strategy() -> impl Strategy<Value = String> {
    "[1-9][0-9]{2,18}"
}

/// Strategy for an arbitrary set of voice flags
fn flags_strategy() -> impl Strategy<Value = PreviousVoiceState> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(
            |(deaf, mute, self_deaf, self_mute, self_video, self_stream)| PreviousVoiceState {
                deaf,
                mute,
                self_deaf,
                self_mute,
                self_video,
                self_stream,
            },
        )
}

fn event_with(
    user_id: &str,
    channel_id: Option<String>,
    old_channel_id: Option<String>,
    flags: PreviousVoiceState,
) -> VoiceStateEvent {
    let mut event = VoiceStateEvent::new(user_id);
    event.channel_id = channel_id.map(ChannelId::new);
    event.old_channel_id = old_channel_id.map(ChannelId::new);
    event.deaf = flags.deaf;
    event.mute = flags.mute;
    event.self_deaf = flags.self_deaf;
    event.self_mute = flags.self_mute;
    event.self_video = flags.self_video;
    event.self_stream = flags.self_stream;
    event
}

fn membership_kinds(kinds: &[EventKind]) -> Vec<EventKind> {
    kinds
        .iter()
        .copied()
        .filter(|k| matches!(k, EventKind::Connected | EventKind::Disconnected | EventKind::Moved))
        .collect()
}

// ============================================================================
// Channel membership
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Appearing in a channel is exactly one connect, addressed to it
    #[test]
    fn prop_connect_addressed_to_new_channel(
        user in id_strategy(),
        channel in id_strategy(),
        previous in proptest::option::of(flags_strategy()),
        flags in flags_strategy(),
    ) {
        let event = event_with(&user, Some(channel.clone()), None, flags);
        let events = classify(&event, previous.as_ref(), None);

        let membership: Vec<_> = events
            .iter()
            .filter(|e| membership_kinds(&[e.kind]).len() == 1)
            .collect();
        prop_assert_eq!(membership.len(), 1);
        prop_assert_eq!(membership[0].kind, EventKind::Connected);
        prop_assert_eq!(&membership[0].voice_channel_id, &ChannelId::new(channel));
    }

    /// Leaving every channel is exactly one disconnect, addressed to the old one
    #[test]
    fn prop_disconnect_addressed_to_old_channel(
        user in id_strategy(),
        old in id_strategy(),
        flags in flags_strategy(),
    ) {
        let event = event_with(&user, None, Some(old.clone()), flags);
        let old = ChannelId::new(old);
        let events = classify(&event, None, Some(&old));

        prop_assert_eq!(events.len(), 1);
        prop_assert_eq!(events[0].kind, EventKind::Disconnected);
        prop_assert_eq!(&events[0].voice_channel_id, &old);
    }

    /// A move is two `Moved` events, never a connect/disconnect pair
    #[test]
    fn prop_move_emits_two_moved(
        user in id_strategy(),
        old in id_strategy(),
        new in id_strategy(),
        previous in proptest::option::of(flags_strategy()),
        flags in flags_strategy(),
    ) {
        prop_assume!(old != new);

        let event = event_with(&user, Some(new.clone()), Some(old.clone()), flags);
        let old = ChannelId::new(old);
        let events = classify(&event, previous.as_ref(), Some(&old));
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();

        prop_assert_eq!(membership_kinds(&kinds), vec![EventKind::Moved, EventKind::Moved]);

        let moved: Vec<_> = events.iter().filter(|e| e.kind == EventKind::Moved).collect();
        prop_assert_eq!(&moved[0].voice_channel_id, &old);
        prop_assert_eq!(&moved[1].voice_channel_id, &ChannelId::new(new));
    }

    /// Membership events always come after every field diff
    #[test]
    fn prop_membership_is_last(
        user in id_strategy(),
        old in proptest::option::of(id_strategy()),
        new in proptest::option::of(id_strategy()),
        previous in flags_strategy(),
        flags in flags_strategy(),
    ) {
        let event = event_with(&user, new, old.clone(), flags);
        let old = old.map(ChannelId::new);
        let kinds: Vec<_> = classify(&event, Some(&previous), old.as_ref())
            .into_iter()
            .map(|e| e.kind)
            .collect();

        if let Some(first) = kinds
            .iter()
            .position(|k| matches!(k, EventKind::Connected | EventKind::Disconnected | EventKind::Moved))
        {
            prop_assert_eq!(membership_kinds(&kinds[first..]).len(), kinds.len() - first);
        }
    }

    /// Never produces the configured-but-dead kinds
    #[test]
    fn prop_never_emits_unreachable_kinds(
        user in id_strategy(),
        old in proptest::option::of(id_strategy()),
        new in proptest::option::of(id_strategy()),
        previous in proptest::option::of(flags_strategy()),
        flags in flags_strategy(),
    ) {
        let event = event_with(&user, new, old.clone(), flags);
        let old = old.map(ChannelId::new);

        for semantic in classify(&event, previous.as_ref(), old.as_ref()) {
            prop_assert!(semantic.kind.is_reachable());
        }
    }
}

// ============================================================================
// Idempotence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Replaying an event after recording it yields no field diffs and no membership change
    #[test]
    fn prop_repeat_event_is_silent(
        user in id_strategy(),
        channel in proptest::option::of(id_strategy()),
        previous in proptest::option::of(flags_strategy()),
        flags in flags_strategy(),
    ) {
        let mut tracker = VoiceStateTracker::new();
        if let Some(previous) = previous {
            tracker.set(voicelog_host::UserId::new(user.clone()), previous);
        }

        let event = event_with(&user, channel.clone(), channel, flags);
        let _ = classify(&event, tracker.get(&event.user_id), event.old_channel_id.as_ref());
        tracker.record(&event);

        let second = classify(&event, tracker.get(&event.user_id), event.old_channel_id.as_ref());
        prop_assert!(second.is_empty());
    }

    /// Local A -> B -> A: the second event's old channel is B whatever the host says
    #[test]
    fn prop_self_correction_uses_remembered_channel(
        a in id_strategy(),
        b in id_strategy(),
        stale in proptest::option::of(id_strategy()),
    ) {
        prop_assume!(a != b);

        let mut tracker = VoiceStateTracker::new();
        tracker.correct_old_channel(&event_with("me", Some(a.clone()), None, PreviousVoiceState::default()));
        tracker.correct_old_channel(&event_with("me", Some(b.clone()), Some(a.clone()), PreviousVoiceState::default()));

        let back = event_with("me", Some(a.clone()), stale, PreviousVoiceState::default());
        let old = tracker.correct_old_channel(&back);
        prop_assert_eq!(old.clone(), Some(ChannelId::new(b.clone())));

        let events = classify(&back, None, old.as_ref());
        prop_assert_eq!(events.len(), 2);
        prop_assert_eq!(&events[0].voice_channel_id, &ChannelId::new(b));
        prop_assert_eq!(&events[1].voice_channel_id, &ChannelId::new(a));
    }
}
