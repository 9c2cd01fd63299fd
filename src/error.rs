//! Error taxonomy shared by every fallible store operation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required argument was missing or out of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Allocation failed (or the table size overflowed) while growing.
    /// The store is left exactly as it was before the call.
    #[error("out of memory while allocating {requested} slots")]
    OutOfMemory { requested: usize },
}
