//! Ordered-sequence capabilities and the store's backing list.
//!
//! `EntryList` is the sequence of record: it holds every live entry
//! exactly once, in insertion order. It is the authoritative count and
//! the source a rebuild iterates to repopulate the bucket array.

use crate::entry::EntryKey;
use crate::error::StoreError;

/// Anything that can report how many elements it holds.
pub trait Collection {
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// An ordered sequence of small copyable references.
pub trait OrderedSequence: Collection {
    type Item: Copy + Eq;

    /// Append at the end. Fails with `OutOfMemory` instead of aborting
    /// when the backing storage cannot grow; the sequence is unchanged.
    fn append(&mut self, item: Self::Item) -> Result<(), StoreError>;

    /// Remove the first occurrence of `item`, keeping the order of the
    /// rest. Returns whether anything was removed.
    fn remove_item(&mut self, item: Self::Item) -> bool;

    fn as_slice(&self) -> &[Self::Item];

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.as_slice().get(index).copied()
    }

    fn first(&self) -> Option<Self::Item> {
        self.as_slice().first().copied()
    }

    fn last(&self) -> Option<Self::Item> {
        self.as_slice().last().copied()
    }

    /// Lazy, finite enumeration over the current elements.
    fn iter(&self) -> core::iter::Copied<core::slice::Iter<'_, Self::Item>> {
        self.as_slice().iter().copied()
    }
}

/// Reserve room for one more element without aborting on failure.
pub(crate) fn try_push<T>(items: &mut Vec<T>, item: T) -> Result<(), StoreError> {
    items
        .try_reserve(1)
        .map_err(|_| StoreError::OutOfMemory {
            requested: items.len().saturating_add(1),
        })?;
    items.push(item);
    Ok(())
}

pub(crate) fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|x| x == item) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

/// Insertion-ordered list of every live entry.
#[derive(Debug, Default)]
pub struct EntryList {
    keys: Vec<EntryKey>,
}

impl EntryList {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Make sure the next `additional` appends cannot fail.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), StoreError> {
        self.keys
            .try_reserve(additional)
            .map_err(|_| StoreError::OutOfMemory {
                requested: self.keys.len().saturating_add(additional),
            })
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }
}

impl Collection for EntryList {
    fn count(&self) -> usize {
        self.keys.len()
    }
}

impl OrderedSequence for EntryList {
    type Item = EntryKey;

    fn append(&mut self, item: EntryKey) -> Result<(), StoreError> {
        try_push(&mut self.keys, item)
    }

    // Linear in the list length; order of the remaining entries is kept.
    fn remove_item(&mut self, item: EntryKey) -> bool {
        remove_first(&mut self.keys, &item)
    }

    fn as_slice(&self) -> &[EntryKey] {
        &self.keys
    }
}
