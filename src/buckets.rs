//! BucketArray: fixed-size table of optional collision chains.
//!
//! The array is never resized in place. Growth builds a fresh array and
//! the store swaps it in only once every entry has been placed.

use crate::chain::CollisionChain;
use crate::entry::EntryKey;
use crate::error::StoreError;
use crate::mix::bucket_index;
use crate::sequence::{Collection, OrderedSequence};
use crate::stats::ChainStats;

#[derive(Debug)]
pub struct BucketArray {
    slots: Vec<Option<CollisionChain>>,
}

impl BucketArray {
    /// Infallible variant for small tables; aborts on allocation failure
    /// like any other `Vec`.
    pub(crate) fn with_size(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        Self {
            slots: (0..size).map(|_| None).collect(),
        }
    }

    /// Allocate `size` empty slots. `size` must be a power of two.
    pub(crate) fn try_with_size(size: usize) -> Result<Self, StoreError> {
        debug_assert!(size.is_power_of_two());
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(size)
            .map_err(|_| StoreError::OutOfMemory { requested: size })?;
        slots.resize_with(size, || None);
        Ok(Self { slots })
    }

    /// Build a table of `size` slots holding every `(entry, raw_hash)`
    /// yielded by `entries`, in order. Nothing is shared with any
    /// existing table, so a failure leaves the caller's state untouched.
    pub(crate) fn try_build<I>(size: usize, entries: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (EntryKey, u64)>,
    {
        let mut table = Self::try_with_size(size)?;
        for (key, hash) in entries {
            let idx = table.index_for(hash);
            table.place(idx, key)?;
        }
        Ok(table)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn index_for(&self, raw_hash: u64) -> usize {
        bucket_index(raw_hash, self.slots.len())
    }

    pub(crate) fn chain(&self, idx: usize) -> Option<&CollisionChain> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn chain_mut(&mut self, idx: usize) -> Option<&mut CollisionChain> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Append `key` to the chain at `idx`, creating the chain on first
    /// use. Either the entry is placed or nothing changes.
    pub(crate) fn place(&mut self, idx: usize, key: EntryKey) -> Result<(), StoreError> {
        match self.slots[idx].as_mut() {
            Some(chain) => chain.append(key),
            None => {
                let mut chain = CollisionChain::try_new()?;
                chain.append(key)?;
                self.slots[idx] = Some(chain);
                Ok(())
            }
        }
    }

    /// Total number of entries across all chains.
    pub(crate) fn entry_count(&self) -> usize {
        self.slots.iter().flatten().map(Collection::count).sum()
    }

    pub(crate) fn stats(&self) -> ChainStats {
        let mut stats = ChainStats::empty(self.size());
        for slot in &self.slots {
            match slot {
                Some(chain) => stats.record_chain(chain.count()),
                None => stats.record_chain(0),
            }
        }
        stats
    }
}
