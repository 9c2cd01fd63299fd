//! Entry storage: the arena slot type and its generational handle.

slotmap::new_key_type! {
    /// Stable handle to an entry in the store's arena. Chains and the
    /// backing sequence refer to entries only through these handles.
    pub struct EntryKey;
}

/// An owned key/value pair. `hash` is the raw (unmixed) hash of `key`,
/// kept so rebuilds never call back into `K: Hash`.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    /// Swap in a new value, handing the previous one back to the caller.
    #[inline]
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
