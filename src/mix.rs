//! Hash spreading applied before bucket indexing.
//!
//! Table sizes are powers of two, so indexing only looks at the low bits
//! of a hash. `mix_hash` folds high-order bits down so that hashes which
//! differ only above the mask still land in different buckets.

/// Spread the bits of a raw hash code.
///
/// Deterministic and pure: lookup, insertion and rebuild all go through
/// this function, so an entry's bucket is reproducible from its raw hash.
#[inline]
pub fn mix_hash(raw: u64) -> u64 {
    let h = raw ^ (raw >> 20) ^ (raw >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

/// Bucket index of `raw` in a table of `table_size` slots.
#[inline]
pub fn bucket_index(raw: u64, table_size: usize) -> usize {
    debug_assert!(table_size > 0);
    (mix_hash(raw) % table_size as u64) as usize
}
