//! Snapshot trait for values kept per entity in a SnapshotStore
//!
//! A snapshot is always stored and replaced as a whole. There is no API for
//! mutating part of a stored snapshot in place.
//!
//! # Example
//!
//! ```rust
//! use state_store::Snapshot;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! pub struct Presence {
//!     pub online: bool,
//! }
//!
//! impl Snapshot for Presence {
//!     const KIND: &'static str = "presence";
//! }
//! ```

/// Marker trait for values that can be stored in a `SnapshotStore`
///
/// Snapshots must be:
/// - Clone: readers receive their own copy
/// - PartialEq: for change detection on replacement
/// - Send + Sync + 'static: so the owning component can move between tasks
///
/// The KIND constant names the snapshot type in logs.
pub trait Snapshot: Clone + Send + Sync + PartialEq + 'static {
    /// Human-readable name of this snapshot type
    const KIND: &'static str;
}
