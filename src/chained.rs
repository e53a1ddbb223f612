//! ChainedTable: fixed bucket array, separate chaining, stable handles.
//!
//! Entries live in a `SlotMap`; each bucket is the chain of slot keys whose
//! home is that bucket, in append order. An entry is only ever linked into
//! its home bucket, and `len()` is the number of live slots, which always
//! equals the sum of chain lengths.

use core::borrow::Borrow;
use core::mem;

use slotmap::{DefaultKey, SlotMap};

use crate::config::{AllocPolicy, TableConfig};
use crate::error::Result;
use crate::reentrancy::ExclusiveAccess;
use crate::strategy::{DeepCopy, KeyStrategy};

/// Owned form of a strategy's key.
pub type OwnedKey<S> = <<S as KeyStrategy>::Key as DeepCopy>::Owned;

/// Stable reference to a live entry. Goes stale (resolves to `None`) once the
/// entry is removed, even if its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, S: KeyStrategy, V>(&self, table: &'a ChainedTable<S, V>) -> Option<&'a S::Key> {
        table.handle_entry(*self).map(Entry::key)
    }

    pub fn value<'a, S: KeyStrategy, V>(&self, table: &'a ChainedTable<S, V>) -> Option<&'a V> {
        table.handle_entry(*self).map(|e| &e.value)
    }

    pub fn value_mut<'a, S: KeyStrategy, V>(
        &self,
        table: &'a mut ChainedTable<S, V>,
    ) -> Option<&'a mut V> {
        table.handle_value_mut(*self)
    }
}

struct Entry<S: KeyStrategy, V> {
    key: OwnedKey<S>,
    value: V,
}

impl<S: KeyStrategy, V> Entry<S, V> {
    #[inline]
    fn key(&self) -> &S::Key {
        Borrow::<S::Key>::borrow(&self.key)
    }
}

/// Map from `S::Key` to `V` with a bucket count fixed at construction.
///
/// The table owns its key copies and entry storage. Values are whatever the
/// caller chooses for `V`; use `V = &T` to keep ownership on the caller's
/// side, in which case the table never frees them.
pub struct ChainedTable<S: KeyStrategy, V> {
    strategy: S,
    policy: AllocPolicy,
    buckets: Vec<Vec<DefaultKey>>,
    entries: SlotMap<DefaultKey, Entry<S, V>>,
    access: ExclusiveAccess,
}

impl<S: KeyStrategy, V> ChainedTable<S, V> {
    /// Allocate `config.capacity()` empty buckets.
    pub fn new(config: TableConfig, strategy: S) -> Result<Self> {
        let buckets = config.alloc_buckets(Vec::new)?;
        log::debug!(
            "chained table created: {} buckets, {:?} on allocation failure",
            buckets.len(),
            config.policy()
        );
        Ok(Self {
            strategy,
            policy: config.policy(),
            buckets,
            entries: SlotMap::with_key(),
            access: ExclusiveAccess::new(),
        })
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    fn home(&self, key: &S::Key) -> usize {
        self.strategy.hash(key) as usize % self.buckets.len()
    }

    /// Home bucket of `key` and the position of its entry in that chain.
    fn chain_position(&self, key: &S::Key) -> (usize, Option<usize>) {
        let home = self.home(key);
        let pos = self.buckets[home]
            .iter()
            .position(|&slot| self.strategy.keys_equal(self.entries[slot].key(), key));
        (home, pos)
    }

    /// Insert `key -> value`, or replace the value of the existing entry.
    ///
    /// Returns the replaced value on update. A new key is deep-copied into
    /// owned storage and appended to the tail of its home chain.
    pub fn put(&mut self, key: &S::Key, value: V) -> Result<Option<V>> {
        let _g = self.access.enter("put");
        let (home, pos) = self.chain_position(key);
        if let Some(pos) = pos {
            let slot = self.buckets[home][pos];
            return Ok(Some(mem::replace(&mut self.entries[slot].value, value)));
        }

        let policy = self.policy;
        let owned = policy.check("key copy", key.deep_copy())?;
        let chain = &mut self.buckets[home];
        policy.check("chain link", chain.try_reserve(1))?;
        if !chain.is_empty() {
            log::trace!("bucket {home}: collision, chain grows to {}", chain.len() + 1);
        }
        let slot = self.entries.insert(Entry { key: owned, value });
        chain.push(slot);
        log::debug!("bucket {home}: new entry, {} live", self.entries.len());
        Ok(None)
    }

    pub fn get(&self, key: &S::Key) -> Option<&V> {
        let _g = self.access.enter("get");
        let (home, pos) = self.chain_position(key);
        pos.map(|p| &self.entries[self.buckets[home][p]].value)
    }

    pub fn get_mut(&mut self, key: &S::Key) -> Option<&mut V> {
        let _g = self.access.enter("get_mut");
        let (home, pos) = self.chain_position(key);
        let slot = self.buckets[home][pos?];
        self.entries.get_mut(slot).map(|e| &mut e.value)
    }

    pub fn has_key(&self, key: &S::Key) -> bool {
        let _g = self.access.enter("has_key");
        self.chain_position(key).1.is_some()
    }

    pub fn find(&self, key: &S::Key) -> Option<Handle> {
        let _g = self.access.enter("find");
        let (home, pos) = self.chain_position(key);
        pos.map(|p| Handle(self.buckets[home][p]))
    }

    /// Unlink and drop the entry for `key`, handing its value back.
    /// Absent keys are a silent no-op.
    pub fn remove(&mut self, key: &S::Key) -> Option<V> {
        let _g = self.access.enter("remove");
        let (home, pos) = self.chain_position(key);
        let slot = self.buckets[home].remove(pos?);
        self.entries.remove(slot).map(|e| e.value)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets; fixed for the table's lifetime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Length of the chain in `bucket`, or `None` if out of range.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.buckets.get(bucket).map(Vec::len)
    }

    /// Drop every entry and key copy; the bucket array is kept. Calling it
    /// on an empty table does nothing.
    pub fn clear(&mut self) {
        let _g = self.access.enter("clear");
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.entries.clear();
    }

    /// Entries in bucket-index order, then chain order.
    pub fn iter(&self) -> Iter<'_, S, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            entries: &self.entries,
        }
    }

    fn handle_entry(&self, h: Handle) -> Option<&Entry<S, V>> {
        let _g = self.access.enter("handle");
        self.entries.get(h.0)
    }

    fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let _g = self.access.enter("handle");
        self.entries.get_mut(h.0).map(|e| &mut e.value)
    }
}

/// Iterator over `(key, value)` pairs of a `ChainedTable`.
pub struct Iter<'a, S: KeyStrategy, V> {
    buckets: core::slice::Iter<'a, Vec<DefaultKey>>,
    chain: core::slice::Iter<'a, DefaultKey>,
    entries: &'a SlotMap<DefaultKey, Entry<S, V>>,
}

impl<'a, S: KeyStrategy, V> Iterator for Iter<'a, S, V> {
    type Item = (&'a S::Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&slot) = self.chain.next() {
                let entries = self.entries;
                let e = &entries[slot];
                return Some((e.key(), &e.value));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }
}

impl<'a, S: KeyStrategy, V> IntoIterator for &'a ChainedTable<S, V> {
    type Item = (&'a S::Key, &'a V);
    type IntoIter = Iter<'a, S, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
