//! Snapshot store: the single current dataset of a session.
//!
//! The store never patches a snapshot. A replace swaps the `Arc` whole, so
//! a reader that cloned the previous `Arc` keeps a consistent old view and
//! every read after the swap sees only the new one.

use std::sync::Arc;

use crate::model::{Role, Section, SectionKey, Snapshot};

/// Holds the current snapshot and counts replacements.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Current snapshot.
    current: Arc<Snapshot>,
    /// Number of replacements since creation.
    generation: u64,
}

impl SnapshotStore {
    /// Create a store holding an initial snapshot.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: Arc::new(initial),
            generation: 0,
        }
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Borrow the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Role the current snapshot was built for.
    #[must_use]
    pub fn role(&self) -> Role {
        self.current.role
    }

    /// Dataset of one section, if the snapshot has it.
    #[must_use]
    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        self.current.section(key)
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&mut self, next: impl Into<Arc<Snapshot>>) -> Arc<Snapshot> {
        self.generation += 1;
        std::mem::replace(&mut self.current, next.into())
    }

    /// Number of replacements so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
