//! Generic Snapshot Storage
//!
//! A small, generic store that keeps the latest snapshot per entity, with
//! whole-value replacement and change detection.
//!
//! # Features
//!
//! - **Typed Snapshots**: any `Clone + PartialEq` value implementing `Snapshot`
//! - **Whole-value Replacement**: snapshots are overwritten, never patched
//! - **Change Detection**: `set` reports whether the value actually changed
//! - **Generic Entity IDs**: use any hashable type as entity identifier
//!
//! # Quick Start
//!
//! ```rust
//! use state_store::{Snapshot, SnapshotStore};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Muted(bool);
//!
//! impl Snapshot for Muted {
//!     const KIND: &'static str = "muted";
//! }
//!
//! let mut store = SnapshotStore::<String, Muted>::new();
//! store.set("user-1".to_string(), Muted(true));
//!
//! assert_eq!(store.get(&"user-1".to_string()), Some(&Muted(true)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! SnapshotStore<Id, S>
//!     │
//!     └── entries: HashMap<Id, S>
//! ```

// Modules
pub mod snapshot;
pub mod store;

// Re-exports - Public API
pub use snapshot::Snapshot;
pub use store::{Replaced, SnapshotStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::snapshot::Snapshot;
    pub use crate::store::{Replaced, SnapshotStore};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Deafened(bool);

    impl Snapshot for Deafened {
        const KIND: &'static str = "deafened";
    }

    #[test]
    fn test_full_workflow() {
        let mut store = SnapshotStore::<String, Deafened>::new();

        assert!(store.set("user-1".to_string(), Deafened(false)).is_change());
        assert!(!store.set("user-1".to_string(), Deafened(false)).is_change());
        assert!(store.set("user-1".to_string(), Deafened(true)).is_change());

        assert_eq!(store.get(&"user-1".to_string()), Some(&Deafened(true)));
    }

    #[test]
    fn test_entities_are_independent() {
        let mut store = SnapshotStore::<String, Deafened>::new();

        store.set("user-1".to_string(), Deafened(false));
        store.set("user-2".to_string(), Deafened(true));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"user-1".to_string()), Some(&Deafened(false)));
        assert_eq!(store.get(&"user-2".to_string()), Some(&Deafened(true)));
    }
}
