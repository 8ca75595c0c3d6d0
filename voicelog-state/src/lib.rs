//! Voice State Tracking and Classification
//!
//! Remembers what every user's voice flags looked like last time and turns
//! each new raw event into an ordered list of semantic events.
//!
//! # Features
//!
//! - **Previous Snapshots**: one `PreviousVoiceState` per user, overwritten whole
//! - **Self Correction**: the local user's old channel is taken from the tracker,
//!   not from the host's unreliable field
//! - **Pure Classification**: `classify` has no side effects and no host access
//! - **Fixed Ordering**: field diffs first, channel membership last
//!
//! # Quick Start
//!
//! ```rust
//! use voicelog_host::{ChannelId, VoiceStateEvent};
//! use voicelog_state::{classify, EventKind, VoiceStateTracker};
//!
//! let mut tracker = VoiceStateTracker::new();
//!
//! let mut event = VoiceStateEvent::new("42");
//! event.channel_id = Some(ChannelId::new("100"));
//!
//! let events = classify(&event, tracker.get(&event.user_id), event.old_channel_id.as_ref());
//! assert_eq!(events[0].kind, EventKind::Connected);
//!
//! tracker.record(&event);
//! ```
//!
//! # Architecture
//!
//! ```text
//! VoiceStateEvent ──▶ VoiceStateTracker::get ──▶ classify ──▶ Vec<SemanticEvent>
//!                            ▲                                      │
//!                            └───────── record (after dispatch) ◀───┘
//! ```

pub mod classifier;
pub mod snapshot;
pub mod tracker;

// ============================================================================
// Re-exports
// ============================================================================

pub use classifier::{classify, classify_membership, EventKind, MembershipChange, SemanticEvent};
pub use snapshot::PreviousVoiceState;
pub use tracker::VoiceStateTracker;

// Storage types callers see through the tracker API
pub use state_store::Replaced;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{classify, EventKind, SemanticEvent};
    pub use crate::snapshot::PreviousVoiceState;
    pub use crate::tracker::VoiceStateTracker;
}
