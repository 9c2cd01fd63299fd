//! Collision chains: entries that share one bucket slot.

use crate::config::INITIAL_CHAIN_CAPACITY;
use crate::entry::{Entry, EntryKey};
use crate::error::StoreError;
use crate::sequence::{remove_first, try_push, Collection, OrderedSequence};
use core::borrow::Borrow;
use slotmap::SlotMap;

/// Entries colliding on one bucket, in the order they were placed.
///
/// Keys are pairwise distinct within a chain; the store checks with
/// `find` before every `append` of a new key.
#[derive(Debug)]
pub struct CollisionChain {
    entries: Vec<EntryKey>,
}

impl CollisionChain {
    /// Allocate an empty chain with the default capacity.
    pub(crate) fn try_new() -> Result<Self, StoreError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(INITIAL_CHAIN_CAPACITY)
            .map_err(|_| StoreError::OutOfMemory {
                requested: INITIAL_CHAIN_CAPACITY,
            })?;
        Ok(Self { entries })
    }

    /// Linear equality scan. Only `K: Eq` runs here; hash equality alone
    /// is never taken as a match.
    pub(crate) fn find<K, V, Q>(
        &self,
        arena: &SlotMap<EntryKey, Entry<K, V>>,
        q: &Q,
    ) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().copied().find(|&k| {
            arena
                .get(k)
                .map(|e| e.key.borrow() == q)
                .unwrap_or(false)
        })
    }
}

impl Collection for CollisionChain {
    fn count(&self) -> usize {
        self.entries.len()
    }
}

impl OrderedSequence for CollisionChain {
    type Item = EntryKey;

    fn append(&mut self, item: EntryKey) -> Result<(), StoreError> {
        try_push(&mut self.entries, item)
    }

    fn remove_item(&mut self, item: EntryKey) -> bool {
        remove_first(&mut self.entries, &item)
    }

    fn as_slice(&self) -> &[EntryKey] {
        &self.entries
    }
}
