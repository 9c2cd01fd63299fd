//! Construction-time tuning for `ChainedHashMap`.

use crate::error::StoreError;

/// Smallest bucket array a store ever uses.
pub const MIN_TABLE_SIZE: usize = 2;
/// Load factor used when none is configured.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// Load factor changes smaller than this are ignored.
pub const LOAD_FACTOR_EPSILON: f64 = 0.01;
/// Capacity reserved for a freshly created collision chain.
pub const INITIAL_CHAIN_CAPACITY: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub initial_table_size: usize,
    pub load_factor: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_table_size: MIN_TABLE_SIZE,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_table_size(mut self, size: usize) -> Self {
        self.initial_table_size = size;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Check that the table size is a power of two no smaller than
    /// `MIN_TABLE_SIZE` and the load factor lies in `(0, 1]`.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.initial_table_size < MIN_TABLE_SIZE || !self.initial_table_size.is_power_of_two() {
            return Err(StoreError::InvalidArgument(
                "initial table size must be a power of two >= 2",
            ));
        }
        if !is_valid_load_factor(self.load_factor) {
            return Err(StoreError::InvalidArgument("load factor must lie in (0, 1]"));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn is_valid_load_factor(lf: f64) -> bool {
    lf.is_finite() && lf > 0.0 && lf <= 1.0
}

/// Smallest power-of-two table (>= `MIN_TABLE_SIZE`) whose threshold
/// `floor(size * load_factor)` admits `count` entries.
///
/// Returns `None` if the size would overflow `usize`.
pub(crate) fn table_size_for(count: usize, load_factor: f64) -> Option<usize> {
    let mut size = MIN_TABLE_SIZE;
    while ((size as f64) * load_factor).floor() < count as f64 {
        size = size.checked_mul(2)?;
    }
    Some(size)
}
