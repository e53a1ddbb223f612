//! Key strategies: the hash/compare pair a table is parametrized over.
//!
//! The tables never look at key bytes themselves. Every placement decision
//! goes through `KeyStrategy::hash` (home bucket is `hash % capacity`) and
//! every equality decision through `KeyStrategy::compare`. Both must be pure:
//! a key that hashed to one value on insert has to hash to the same value on
//! every later lookup, or the entry becomes unreachable.

use core::borrow::Borrow;
use core::cmp::Ordering;
use std::collections::TryReserveError;

/// Owned, byte-exact duplicate of a borrowed key.
///
/// The tables store `Owned` and never alias caller memory. Copies are
/// allocated fallibly so the table's `AllocPolicy` decides what a failed
/// copy means.
pub trait DeepCopy {
    type Owned: Borrow<Self>;

    fn deep_copy(&self) -> Result<Self::Owned, TryReserveError>;
}

impl DeepCopy for [u8] {
    type Owned = Box<[u8]>;

    fn deep_copy(&self) -> Result<Box<[u8]>, TryReserveError> {
        let mut v = Vec::new();
        v.try_reserve_exact(self.len())?;
        v.extend_from_slice(self);
        Ok(v.into_boxed_slice())
    }
}

impl DeepCopy for str {
    type Owned = Box<str>;

    fn deep_copy(&self) -> Result<Box<str>, TryReserveError> {
        let mut s = String::new();
        s.try_reserve_exact(self.len())?;
        s.push_str(self);
        Ok(s.into_boxed_str())
    }
}

macro_rules! copy_by_value {
    ($($t:ty),*) => {$(
        impl DeepCopy for $t {
            type Owned = $t;

            #[inline]
            fn deep_copy(&self) -> Result<$t, TryReserveError> {
                Ok(*self)
            }
        }
    )*};
}

copy_by_value!(i32, u32, i64, u64);

/// Hash and three-way compare over one key type.
pub trait KeyStrategy {
    type Key: ?Sized + DeepCopy;

    fn hash(&self, key: &Self::Key) -> u32;

    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering;

    #[inline]
    fn keys_equal(&self, a: &Self::Key, b: &Self::Key) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

/// Multiply-xor-shift avalanche over the bit pattern of a 32-bit key.
/// Fixed constants; results are stable across runs and platforms.
#[inline]
pub fn hash_int(key: i32) -> u32 {
    let mut x = key as u32;
    x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    (x >> 16) ^ x
}

/// djb2: `h = h * 33 + byte` seeded with 5381, stopping at the first NUL.
#[inline]
pub fn hash_bytes(key: &[u8]) -> u32 {
    key.iter()
        .take_while(|&&b| b != 0)
        .fold(5381u32, |h, &b| {
            (h << 5).wrapping_add(h).wrapping_add(u32::from(b))
        })
}

#[inline]
pub fn compare_int(a: i32, b: i32) -> Ordering {
    a.cmp(&b)
}

/// Lexicographic, unsigned byte-wise.
#[inline]
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// 32-bit signed integer keys.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntKeys;

impl KeyStrategy for IntKeys {
    type Key = i32;

    #[inline]
    fn hash(&self, key: &i32) -> u32 {
        hash_int(*key)
    }

    #[inline]
    fn compare(&self, a: &i32, b: &i32) -> Ordering {
        compare_int(*a, *b)
    }
}

/// UTF-8 string keys, hashed and compared by their bytes.
#[derive(Copy, Clone, Debug, Default)]
pub struct StrKeys;

impl KeyStrategy for StrKeys {
    type Key = str;

    #[inline]
    fn hash(&self, key: &str) -> u32 {
        hash_bytes(key.as_bytes())
    }

    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_bytes(a.as_bytes(), b.as_bytes())
    }
}

/// Raw byte-string keys.
#[derive(Copy, Clone, Debug, Default)]
pub struct BytesKeys;

impl KeyStrategy for BytesKeys {
    type Key = [u8];

    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        hash_bytes(key)
    }

    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        compare_bytes(a, b)
    }
}

/// A strategy assembled from two plain function pointers, chosen by the
/// caller at construction time.
pub struct FnStrategy<K: ?Sized> {
    hash: fn(&K) -> u32,
    compare: fn(&K, &K) -> Ordering,
}

impl<K: ?Sized> FnStrategy<K> {
    pub fn new(hash: fn(&K) -> u32, compare: fn(&K, &K) -> Ordering) -> Self {
        Self { hash, compare }
    }
}

impl<K: ?Sized> Clone for FnStrategy<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for FnStrategy<K> {}

impl<K: ?Sized + DeepCopy> KeyStrategy for FnStrategy<K> {
    type Key = K;

    #[inline]
    fn hash(&self, key: &K) -> u32 {
        (self.hash)(key)
    }

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }
}
