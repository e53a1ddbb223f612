//! Debug-only guard against strategy code re-entering a table.
//!
//! Table operations call into `KeyStrategy::hash`/`compare` while a chain
//! or probe sequence is being walked. In debug builds, a second entry into
//! the same table before the first operation returns panics with the name
//! of the operation in progress. In release builds the guard compiles away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table tracker. Public operations start with
/// `let _g = self.access.enter("op");`.
#[derive(Debug)]
pub struct ExclusiveAccess {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Tables are single-owner; keep them !Send + !Sync.
    _single_owner: PhantomData<*mut ()>,
}

impl ExclusiveAccess {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_owner: PhantomData,
        }
    }

    /// Mark `op` as running. Panics in debug builds if another operation on
    /// the same table has not returned yet.
    #[inline]
    pub fn enter(&self, op: &'static str) -> AccessGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrancy detected: `{op}` called while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            AccessGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            AccessGuard { _z: PhantomData }
        }
    }

    /// Name of the operation currently holding the guard. Always `None` in
    /// release builds.
    pub fn active(&self) -> Option<&'static str> {
        #[cfg(debug_assertions)]
        {
            self.active.get()
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    }
}

impl Default for ExclusiveAccess {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `ExclusiveAccess::enter`.
pub struct AccessGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ExclusiveAccess,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active().is_some());
            self.owner.active.set(None);
        }
    }
}
