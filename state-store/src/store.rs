//! Keyed snapshot storage
//!
//! `SnapshotStore<Id, S>` keeps the latest snapshot of type `S` for every
//! entity it has seen. Entries are created on first `set` and then only ever
//! replaced as a whole. Nothing is evicted: the store lives as long as its
//! owner.
//!
//! The store is a plain owned value. It sits inside exactly one component
//! that serializes access through `&mut self`, so it carries no locks.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use crate::snapshot::Snapshot;

/// Outcome of replacing a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replaced {
    /// No snapshot existed for the entity before
    Inserted,
    /// A snapshot existed and differed from the new one
    Changed,
    /// A snapshot existed and was equal to the new one
    Unchanged,
}

impl Replaced {
    /// Whether the stored value is different after the replacement
    pub fn is_change(self) -> bool {
        !matches!(self, Replaced::Unchanged)
    }
}

/// Latest-snapshot-per-entity storage
///
/// # Example
///
/// ```rust
/// use state_store::{Replaced, Snapshot, SnapshotStore};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Presence(bool);
/// impl Snapshot for Presence {
///     const KIND: &'static str = "presence";
/// }
///
/// let mut store = SnapshotStore::<String, Presence>::new();
/// let alice = "alice".to_string();
///
/// assert_eq!(store.get(&alice), None);
/// assert_eq!(store.set(alice.clone(), Presence(true)), Replaced::Inserted);
/// assert_eq!(store.set(alice.clone(), Presence(true)), Replaced::Unchanged);
/// assert_eq!(store.set(alice.clone(), Presence(false)), Replaced::Changed);
/// assert_eq!(store.get(&alice), Some(&Presence(false)));
/// ```
pub struct SnapshotStore<Id, S>
where
    Id: Clone + Eq + Hash,
    S: Snapshot,
{
    /// entity_id -> latest snapshot
    entries: HashMap<Id, S>,
}

impl<Id, S> SnapshotStore<Id, S>
where
    Id: Clone + Eq + Hash,
    S: Snapshot,
{
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get the latest snapshot for an entity
    ///
    /// Returns `None` if the entity has never been set.
    pub fn get(&self, entity_id: &Id) -> Option<&S> {
        self.entries.get(entity_id)
    }

    /// Replace the snapshot for an entity
    ///
    /// The previous value, if any, is dropped entirely. The return value
    /// reports whether the stored snapshot actually changed.
    pub fn set(&mut self, entity_id: Id, snapshot: S) -> Replaced {
        match self.entries.entry(entity_id) {
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
                Replaced::Inserted
            }
            Entry::Occupied(mut slot) => {
                if *slot.get() == snapshot {
                    Replaced::Unchanged
                } else {
                    slot.insert(snapshot);
                    Replaced::Changed
                }
            }
        }
    }

    /// Number of entities with a snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Id, S> Default for SnapshotStore<Id, S>
where
    Id: Clone + Eq + Hash,
    S: Snapshot,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, S> std::fmt::Debug for SnapshotStore<Id, S>
where
    Id: Clone + Eq + Hash,
    S: Snapshot,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("kind", &S::KIND)
            .field("entity_count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct TestSnap {
        muted: bool,
        streaming: Option<bool>,
    }

    impl Snapshot for TestSnap {
        const KIND: &'static str = "test";
    }

    fn snap(muted: bool, streaming: Option<bool>) -> TestSnap {
        TestSnap { muted, streaming }
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::<String, TestSnap>::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(&"a".to_string()).is_none());
    }

    #[test]
    fn test_set_reports_insert_change_and_noop() {
        let mut store = SnapshotStore::<String, TestSnap>::new();
        let id = "user-1".to_string();

        assert_eq!(store.set(id.clone(), snap(false, None)), Replaced::Inserted);
        assert_eq!(store.set(id.clone(), snap(false, None)), Replaced::Unchanged);
        assert_eq!(store.set(id.clone(), snap(true, None)), Replaced::Changed);
        assert_eq!(store.get(&id), Some(&snap(true, None)));
    }

    #[test]
    fn test_replacement_is_whole_value() {
        let mut store = SnapshotStore::<String, TestSnap>::new();
        let id = "user-1".to_string();

        store.set(id.clone(), snap(true, Some(true)));
        store.set(id.clone(), snap(false, None));

        // Optional field is cleared, not merged from the old value
        assert_eq!(store.get(&id), Some(&snap(false, None)));
    }

    #[test]
    fn test_multiple_entities() {
        let mut store = SnapshotStore::<String, TestSnap>::new();
        store.set("a".to_string(), snap(true, None));
        store.set("b".to_string(), snap(false, None));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"a".to_string()), Some(&snap(true, None)));
        assert_eq!(store.get(&"b".to_string()), Some(&snap(false, None)));
        assert!(store.get(&"c".to_string()).is_none());
    }

    #[test]
    fn test_replaced_is_change() {
        assert!(Replaced::Inserted.is_change());
        assert!(Replaced::Changed.is_change());
        assert!(!Replaced::Unchanged.is_change());
    }

    #[test]
    fn test_debug_format() {
        let mut store = SnapshotStore::<String, TestSnap>::new();
        store.set("a".to_string(), snap(true, None));
        let debug = format!("{:?}", store);
        assert!(debug.contains("entity_count: 1"));
        assert!(debug.contains("\"test\""));
    }
}
