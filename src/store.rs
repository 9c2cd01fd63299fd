//! ChainedHashMap: the associative store.
//!
//! Every operation hashes the key once through `S`, mixes the raw hash,
//! reduces it modulo the table size and works on the collision chain at
//! that index. Growth and load-factor changes rebuild the whole bucket
//! array from the insertion-ordered `EntryList`.

use crate::buckets::BucketArray;
use crate::config::{
    is_valid_load_factor, table_size_for, StoreConfig, DEFAULT_LOAD_FACTOR, LOAD_FACTOR_EPSILON,
    MIN_TABLE_SIZE,
};
use crate::entry::{Entry, EntryKey};
use crate::error::StoreError;
use crate::reentrancy::ExclusiveAccess;
use crate::sequence::{Collection, EntryList, OrderedSequence};
use crate::stats::ChainStats;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace, warn};
use slotmap::SlotMap;

/// Structural state, kept apart from the hasher and the access guard so
/// that guarded entry points can borrow it mutably.
///
/// Field order is drop order: chains go first, then the backing list,
/// then the entries themselves (and with them every key and value).
struct Table<K, V> {
    buckets: BucketArray,
    order: EntryList,
    arena: SlotMap<EntryKey, Entry<K, V>>,
    load_factor: f64,
}

impl<K, V> Table<K, V> {
    fn with_buckets(buckets: BucketArray, load_factor: f64) -> Self {
        Self {
            buckets,
            order: EntryList::new(),
            arena: SlotMap::with_key(),
            load_factor,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.order.count()
    }

    fn find<Q>(&self, hash: u64, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.buckets.index_for(hash);
        self.buckets.chain(idx)?.find(&self.arena, q)
    }

    /// Replace the bucket array with one of `size` slots populated from
    /// the backing list. The old array survives any failure.
    fn rebuild(&mut self, size: usize) -> Result<(), StoreError> {
        let arena = &self.arena;
        let entries = self
            .order
            .iter()
            .filter_map(|k| arena.get(k).map(|e| (k, e.hash)));
        let fresh = BucketArray::try_build(size, entries)?;
        debug_assert_eq!(fresh.entry_count(), self.order.count());
        trace!("rebuilt {} entries into {} buckets", self.len(), size);
        self.buckets = fresh;
        Ok(())
    }

    /// Grow until `needed` entries fit under the load factor.
    fn reserve_for(&mut self, needed: usize) -> Result<(), StoreError> {
        let old = self.buckets.size();
        let mut size = old;
        while needed as f64 > size as f64 * self.load_factor {
            size = size
                .checked_mul(2)
                .ok_or(StoreError::OutOfMemory { requested: usize::MAX })?;
        }
        if size == old {
            return Ok(());
        }
        debug!("growing table {} -> {} buckets ({} entries)", old, size, self.len());
        self.rebuild(size).map_err(|e| {
            warn!("growth to {} buckets aborted: {}", size, e);
            e
        })
    }

    fn insert(&mut self, hash: u64, key: K, value: V) -> Result<Option<V>, StoreError>
    where
        K: Eq,
    {
        self.reserve_for(self.len() + 1)?;

        if let Some(existing) = self.find(hash, &key) {
            // Keep the stored key; the duplicate passed in is dropped.
            if let Some(entry) = self.arena.get_mut(existing) {
                return Ok(Some(entry.replace_value(value)));
            }
        }

        self.order.try_reserve(1)?;
        let idx = self.buckets.index_for(hash);
        let ek = self.arena.insert(Entry::new(key, value, hash));
        if let Err(e) = self.buckets.place(idx, ek) {
            self.arena.remove(ek);
            return Err(e);
        }
        self.order.append(ek)?;
        debug_assert_eq!(self.arena.len(), self.order.count());
        Ok(None)
    }

    fn remove<Q>(&mut self, hash: u64, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = self.buckets.index_for(hash);
        let chain = self.buckets.chain_mut(idx)?;
        let ek = chain.find(&self.arena, q)?;
        chain.remove_item(ek);
        self.order.remove_item(ek);
        self.arena.remove(ek).map(Entry::into_pair)
    }

    fn set_load_factor(&mut self, load_factor: f64) -> Result<(), StoreError> {
        if !is_valid_load_factor(load_factor) {
            trace!("ignoring out-of-range load factor {}", load_factor);
            return Ok(());
        }
        if (load_factor - self.load_factor).abs() < LOAD_FACTOR_EPSILON {
            return Ok(());
        }
        if load_factor < self.load_factor {
            self.rebuild(self.buckets.size())?;
        }
        trace!("load factor {} -> {}", self.load_factor, load_factor);
        self.load_factor = load_factor;
        Ok(())
    }

    fn clear(&mut self) {
        let size = self.buckets.size();
        self.buckets = BucketArray::with_size(size);
        self.order.clear();
        self.arena.clear();
    }
}

/// A separate-chaining hash map that remembers insertion order.
///
/// Keys are unique. Re-inserting a key overwrites its value in place and
/// keeps its original position in iteration order. The bucket array is a
/// power of two in size and doubles whenever an insertion would push the
/// entry count past `table_size * load_factor`; it never shrinks.
///
/// Single-threaded: the map is `!Sync`, and in debug builds a `Hash` or
/// `Eq` implementation that calls back into the same map panics.
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: Table<K, V>,
    busy: ExclusiveAccess,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_config_and_hasher(config, Default::default())
    }

    /// Build a map from `(key, value)` pairs in order. Later duplicates
    /// overwrite the value of the first occurrence, which keeps its
    /// position. A `None` value rejects the whole construction.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        Self::from_pairs_with_hasher(pairs, Default::default())
    }

    pub fn try_from_iter<I>(iter: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs(iter.into_iter().map(|(k, v)| (k, Some(v))))
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: Table::with_buckets(BucketArray::with_size(MIN_TABLE_SIZE), DEFAULT_LOAD_FACTOR),
            busy: ExclusiveAccess::new(),
        }
    }

    pub fn with_config_and_hasher(config: StoreConfig, hasher: S) -> Result<Self, StoreError> {
        config.validate()?;
        let buckets = BucketArray::try_with_size(config.initial_table_size)?;
        Ok(Self {
            hasher,
            table: Table::with_buckets(buckets, config.load_factor),
            busy: ExclusiveAccess::new(),
        })
    }

    pub fn from_pairs_with_hasher<I>(pairs: I, hasher: S) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| match v {
                Some(v) => Ok((k, v)),
                None => Err(StoreError::InvalidArgument("missing value for key")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Sized for every pair, so no insertion below triggers growth.
        let size = table_size_for(pairs.len(), DEFAULT_LOAD_FACTOR)
            .ok_or(StoreError::OutOfMemory { requested: usize::MAX })?;
        let config = StoreConfig::new().with_initial_table_size(size);
        let mut map = Self::with_config_and_hasher(config, hasher)?;
        for (k, v) in pairs {
            map.insert(k, v)?;
        }

        // Duplicates may have left the table larger than needed.
        let fitted = table_size_for(map.len(), DEFAULT_LOAD_FACTOR).unwrap_or(size);
        if fitted < size {
            map.table.rebuild(fitted)?;
        }
        Ok(map)
    }

    #[inline]
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of buckets; always a power of two.
    pub fn table_size(&self) -> usize {
        self.table.buckets.size()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(q);
        let ek = self.table.find(hash, q)?;
        self.table.arena.get(ek).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.hasher.hash_one(q);
        let ek = self.table.find(hash, q)?;
        self.table.arena.get_mut(ek).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(q);
        self.table.find(hash, q).is_some()
    }

    /// Associate `value` with `key`.
    ///
    /// Returns the previous value if the key was already present; the
    /// entry count and iteration order are then unchanged. Growth happens
    /// before the key is looked up. On `OutOfMemory` the map is exactly
    /// as it was and `key`/`value` are dropped.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, StoreError> {
        let _g = self.busy.enter();
        let hash = self.hasher.hash_one(&key);
        self.table.insert(hash, key, value)
    }

    /// Remove `q` and return its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.hasher.hash_one(q);
        self.table.remove(hash, q)
    }

    /// Change the growth threshold.
    ///
    /// Values outside `(0, 1]`, and changes smaller than
    /// `LOAD_FACTOR_EPSILON`, are ignored without error. Lowering the
    /// factor re-indexes every entry at the current table size; raising
    /// it only affects later growth decisions.
    pub fn set_load_factor(&mut self, load_factor: f64) -> Result<(), StoreError> {
        let _g = self.busy.enter();
        self.table.set_load_factor(load_factor)
    }

    /// Drop every entry. The table keeps its current size.
    pub fn clear(&mut self) {
        let _g = self.busy.enter();
        self.table.clear();
    }

    pub fn chain_stats(&self) -> ChainStats {
        self.table.buckets.stats()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            order: self.table.order.as_slice().iter(),
            arena: &self.table.arena,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Oldest live entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Most recently added live entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }
}

impl<K, V, S> Collection for ChainedHashMap<K, V, S> {
    fn count(&self) -> usize {
        self.table.len()
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Insertion-ordered iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    order: core::slice::Iter<'a, EntryKey>,
    arena: &'a SlotMap<EntryKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.order
            .by_ref()
            .find_map(|&k| arena.get(k).map(|e| (&e.key, &e.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.order.len()))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.order
            .by_ref()
            .rev()
            .find_map(|&k| arena.get(k).map(|e| (&e.key, &e.value)))
    }
}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
}
