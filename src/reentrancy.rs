//! Debug-only guard against re-entering the store from user callbacks.
//!
//! While probing a chain the store calls `K: Eq` (and `K: Hash` before
//! that). A callback that reaches back into the same store would observe
//! a half-updated table during insert or remove. Debug builds panic on
//! such nesting; release builds compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-store busy flag. Public entry points take
/// `let _g = self.busy.enter();` before touching the table.
#[derive(Debug)]
pub(crate) struct ExclusiveAccess {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // The store is single-threaded.
    _not_sync: PhantomData<Cell<()>>,
}

impl ExclusiveAccess {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _not_sync: PhantomData,
        }
    }

    /// Mark the store busy until the returned guard drops.
    ///
    /// Panics in debug builds if the store is already busy.
    #[inline]
    pub(crate) fn enter(&self) -> AccessGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant access: store used from inside a Hash/Eq callback"
            );
            return AccessGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return AccessGuard { _owner: PhantomData };
        }
    }
}

impl Default for ExclusiveAccess {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct AccessGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ExclusiveAccess,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}
