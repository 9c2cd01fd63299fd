//! chained-hashmap: a single-threaded, separate-chaining hash map with
//! insertion-ordered entries and load-factor driven growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep three coupled concerns correct at once: the resize
//!   protocol (every live entry rehashed, none lost or duplicated), chain
//!   management (keys unique within a chain), and ownership (removing or
//!   replacing an entry never frees something still reachable).
//! - Layers:
//!   - `mix`: the hash spreading function and bucket index reduction.
//!   - `Entry` / `EntryKey`: entries live in a slotmap arena; everything
//!     else refers to them by generational handle.
//!   - `EntryList`: the insertion-ordered backing sequence; authoritative
//!     count and the source for every rebuild.
//!   - `CollisionChain` / `BucketArray`: power-of-two table of lazily
//!     created chains, resolved by linear `Eq` scan.
//!   - `ChainedHashMap<K, V, S>`: public API orchestrating lookup,
//!     insertion, removal, growth and load-factor changes.
//!
//! Ownership
//! - The arena is the only owner of keys and values. Chains and the
//!   backing list hold `EntryKey`s, so dropping a bucket array never
//!   touches an entry. Dropping the map drops chains, then the list, then
//!   the arena (and with it every key and value).
//! - Overwriting a key moves the old value out to the caller in the same
//!   step the new one moves in; there is no window with both or neither.
//! - Callers that want to share keys or values with the map store `Rc`s.
//!
//! Growth
//! - Before each insertion: if `len + 1 > table_size * load_factor` the
//!   table doubles (repeatedly, if the load factor was lowered) and every
//!   entry is re-indexed from `EntryList` in insertion order.
//! - Rebuilds are transactional: the new table is fully built with
//!   fallible allocation before it replaces the old one, so
//!   `StoreError::OutOfMemory` leaves the map unchanged.
//! - Entries remember their raw hash; rebuilds re-mix it instead of
//!   calling `K: Hash` again.
//! - The table never shrinks.
//!
//! Quirks kept on purpose
//! - Removing an absent key is a no-op returning `None`.
//! - `set_load_factor` ignores values outside `(0, 1]` and changes under
//!   `LOAD_FACTOR_EPSILON`, returning `Ok(())`.
//!
//! Reentrancy
//! - Public entry points take a debug-only guard; `Hash`/`Eq` impls that
//!   call back into the same map panic in debug builds.

mod buckets;
mod chain;
pub mod config;
mod entry;
mod error;
pub mod mix;
mod reentrancy;
mod sequence;
mod stats;
mod store;

// Public surface
pub use config::{StoreConfig, DEFAULT_LOAD_FACTOR, LOAD_FACTOR_EPSILON, MIN_TABLE_SIZE};
pub use error::StoreError;
pub use sequence::{Collection, OrderedSequence};
pub use stats::ChainStats;
pub use store::{ChainedHashMap, Iter, Keys, Values};
