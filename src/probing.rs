//! ProbingCounter: single-slot buckets, linear probing, insert-or-increment.
//!
//! A key lives in its home slot or in the first free slot found scanning
//! forward from it, wrapping at the end of the array. There is no delete, so
//! a probe sequence never has holes and a lookup can stop at the first empty
//! slot.

use core::borrow::Borrow;

use crate::chained::OwnedKey;
use crate::config::{AllocPolicy, TableConfig};
use crate::error::{Error, Result};
use crate::reentrancy::ExclusiveAccess;
use crate::strategy::{DeepCopy, KeyStrategy};

struct Slot<S: KeyStrategy> {
    key: OwnedKey<S>,
    // Never zero for an occupied slot.
    count: u64,
}

impl<S: KeyStrategy> Slot<S> {
    #[inline]
    fn key(&self) -> &S::Key {
        Borrow::<S::Key>::borrow(&self.key)
    }
}

/// Occurrence counter over `S::Key` with a fixed number of slots.
///
/// The probe sequence is bounded by the capacity: once every slot holds a
/// key, `increment` on a new key fails with `Error::CapacityExhausted`
/// instead of cycling. Size the table to at least the number of distinct
/// keys it will ever see.
pub struct ProbingCounter<S: KeyStrategy> {
    strategy: S,
    policy: AllocPolicy,
    slots: Vec<Option<Slot<S>>>,
    occupied: usize,
    access: ExclusiveAccess,
}

impl<S: KeyStrategy> ProbingCounter<S> {
    pub fn new(config: TableConfig, strategy: S) -> Result<Self> {
        let slots = config.alloc_buckets(|| None)?;
        log::debug!(
            "probing counter created: {} slots, {:?} on allocation failure",
            slots.len(),
            config.policy()
        );
        Ok(Self {
            strategy,
            policy: config.policy(),
            slots,
            occupied: 0,
            access: ExclusiveAccess::new(),
        })
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Index of the slot that holds `key`, or of the empty slot where it
    /// belongs. `None` if the whole table was scanned without finding either.
    fn probe(&self, key: &S::Key) -> Option<usize> {
        let cap = self.slots.len();
        let home = self.strategy.hash(key) as usize % cap;
        let step = (0..cap).find(|&step| match &self.slots[(home + step) % cap] {
            None => true,
            Some(slot) => self.strategy.keys_equal(slot.key(), key),
        })?;
        if step > 0 {
            log::trace!("slot {home}: probed {step} past home");
        }
        Some((home + step) % cap)
    }

    /// Add one occurrence of `key`, inserting it with a count of 1 if it is
    /// new. Returns the updated count.
    pub fn increment(&mut self, key: &S::Key) -> Result<u64> {
        let _g = self.access.enter("increment");
        let Some(idx) = self.probe(key) else {
            log::warn!(
                "probing counter full ({} slots), rejecting new key",
                self.slots.len()
            );
            return Err(Error::CapacityExhausted {
                capacity: self.slots.len(),
            });
        };
        match &mut self.slots[idx] {
            Some(slot) => {
                slot.count += 1;
                Ok(slot.count)
            }
            empty => {
                let owned = self.policy.check("key copy", key.deep_copy())?;
                *empty = Some(Slot {
                    key: owned,
                    count: 1,
                });
                self.occupied += 1;
                log::debug!("slot {idx}: new key, {} distinct", self.occupied);
                Ok(1)
            }
        }
    }

    /// Current count for `key`; `None` if it was never inserted.
    pub fn count(&self, key: &S::Key) -> Option<u64> {
        let _g = self.access.enter("count");
        let idx = self.probe(key)?;
        self.slots[idx].as_ref().map(|s| s.count)
    }

    pub fn contains_key(&self, key: &S::Key) -> bool {
        self.count(key).is_some()
    }

    /// Visit every occupied slot in slot-index order. This is neither
    /// insertion order nor key order.
    pub fn for_each_occupied<F>(&self, mut visitor: F)
    where
        F: FnMut(&S::Key, u64),
    {
        let _g = self.access.enter("for_each_occupied");
        for slot in self.slots.iter().flatten() {
            visitor(slot.key(), slot.count);
        }
    }

    /// `(key, count)` pairs in slot-index order.
    pub fn iter(&self) -> impl Iterator<Item = (&S::Key, u64)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.key(), slot.count))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, c)| c).sum()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.slots.len() as f64
    }
}
