//! Construction-time configuration for both table flavours.

use std::collections::TryReserveError;

use crate::error::{Error, Result, ERROR_STATUS};

/// What to do when the table cannot allocate storage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AllocPolicy {
    /// Return `Error::Alloc` to the caller.
    #[default]
    Propagate,
    /// Report a diagnostic on stderr and terminate the process with
    /// `ERROR_STATUS`, the way the C exercises did. Never returns.
    Fatal,
}

impl AllocPolicy {
    /// Route an allocation failure through the policy.
    pub(crate) fn check<T>(
        self,
        what: &'static str,
        res: std::result::Result<T, TryReserveError>,
    ) -> Result<T> {
        match res {
            Ok(v) => Ok(v),
            Err(source) => match self {
                AllocPolicy::Propagate => Err(Error::alloc(what, source)),
                AllocPolicy::Fatal => {
                    log::debug!("allocation of {what} failed: {source}");
                    eprintln!("Error allocating memory");
                    std::process::exit(ERROR_STATUS)
                }
            },
        }
    }
}

/// Fixed bucket count plus allocation policy. Capacity never changes after
/// the table is built.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    capacity: usize,
    alloc_policy: AllocPolicy,
}

impl TableConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            alloc_policy: AllocPolicy::default(),
        }
    }

    pub fn alloc_policy(mut self, policy: AllocPolicy) -> Self {
        self.alloc_policy = policy;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> AllocPolicy {
        self.alloc_policy
    }

    /// Validate the capacity and allocate `capacity` buckets of `T`, each
    /// produced by `empty`.
    pub(crate) fn alloc_buckets<T>(&self, empty: impl FnMut() -> T) -> Result<Vec<T>> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        let mut buckets = Vec::new();
        self.alloc_policy
            .check("bucket array", buckets.try_reserve_exact(self.capacity))?;
        buckets.resize_with(self.capacity, empty);
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_policy() {
        let c = TableConfig::new(8).alloc_policy(AllocPolicy::Fatal);
        assert_eq!(c.capacity(), 8);
        assert_eq!(c.policy(), AllocPolicy::Fatal);
        assert_eq!(TableConfig::new(8).policy(), AllocPolicy::Propagate);
    }

    /// Invariant: zero buckets are rejected before any allocation.
    #[test]
    fn zero_capacity_rejected() {
        let res = TableConfig::new(0).alloc_buckets(|| 0u8);
        assert!(matches!(res, Err(Error::ZeroCapacity)));
    }

    /// Invariant: under `Propagate` an impossible bucket array surfaces as
    /// `Error::Alloc` instead of aborting.
    #[test]
    fn oversized_bucket_array_propagates() {
        let res = TableConfig::new(usize::MAX).alloc_buckets(|| [0u64; 4]);
        match res {
            Err(Error::Alloc { what, .. }) => assert_eq!(what, "bucket array"),
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
    }
}
