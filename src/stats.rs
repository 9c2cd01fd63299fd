//! Bucket occupancy statistics, for profiling hash quality.

use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChainStats {
    pub table_size: usize,
    pub count: usize,
    pub empty_buckets: usize,
    pub filled_buckets: usize,
    /// Shortest non-empty chain; 0 when every bucket is empty.
    pub min_chain: usize,
    pub max_chain: usize,
}

impl ChainStats {
    pub(crate) fn empty(table_size: usize) -> Self {
        Self {
            table_size,
            count: 0,
            empty_buckets: 0,
            filled_buckets: 0,
            min_chain: 0,
            max_chain: 0,
        }
    }

    pub(crate) fn record_chain(&mut self, len: usize) {
        if len == 0 {
            self.empty_buckets += 1;
            return;
        }
        if self.filled_buckets == 0 || len < self.min_chain {
            self.min_chain = len;
        }
        self.max_chain = self.max_chain.max(len);
        self.filled_buckets += 1;
        self.count += len;
    }

    /// Average length of the non-empty chains.
    pub fn mean_chain(&self) -> f64 {
        if self.filled_buckets == 0 {
            0.0
        } else {
            self.count as f64 / self.filled_buckets as f64
        }
    }
}

impl fmt::Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size: {}, count: {}, empty: {}, filled: {}, min chain: {}, max chain: {}, mean chain: {:.2}",
            self.table_size,
            self.count,
            self.empty_buckets,
            self.filled_buckets,
            self.min_chain,
            self.max_chain,
            self.mean_chain()
        )
    }
}
