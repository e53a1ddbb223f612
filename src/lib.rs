//! keyed-tables: fixed-capacity hash tables parametrized by a key strategy.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one associative container contract, two collision disciplines,
//!   with every key decision delegated to a caller-supplied strategy.
//! - Layers:
//!   - `KeyStrategy`: `hash(key) -> u32` plus a three-way `compare`. The
//!     tables never interpret key bytes; the home bucket is
//!     `hash % capacity`.
//!   - `ChainedTable<S, V>`: bucket array of chains. Supports put (insert
//!     or update in place), get, has_key, remove, and stable handles.
//!   - `ProbingCounter<S>`: bucket array of single slots with linear
//!     probing. Insert-or-increment only; no delete.
//!   - Clients: `freq` (word/number frequencies) and `cardinality`
//!     (HyperLogLog over the shared integer hash).
//!
//! Constraints
//! - Capacity is fixed at construction; there is no resizing or rehashing.
//! - Single-threaded: tables are `!Send`/`!Sync`.
//! - Keys are deep-copied into owned storage on first insert and released
//!   when the entry or table goes away. Values are whatever the caller picks
//!   for `V`; a `&T` value keeps ownership with the caller.
//! - Key uniqueness: no two live entries compare equal.
//!
//! Allocation failure
//! - `AllocPolicy::Propagate` returns `Error::Alloc`.
//! - `AllocPolicy::Fatal` prints a diagnostic and exits with status `-1`,
//!   which is what the `keycount` binary uses by default.
//!
//! Capacity exhaustion
//! - A probing counter with every slot occupied rejects new keys with
//!   `Error::CapacityExhausted`. The probe sequence never visits more than
//!   `capacity` slots, so a full table cannot loop.
//!
//! Reentrancy policy
//! - Strategy code runs while a table operation is in progress. Calling back
//!   into the same table from `hash`/`compare` panics in debug builds.
//!
//! Iteration order
//! - Bucket-index order only. Not insertion order, not key order.

pub mod cardinality;
pub mod chained;
mod chained_proptest;
pub mod config;
pub mod error;
pub mod freq;
pub mod probing;
mod reentrancy;
pub mod strategy;

// Public surface
pub use chained::{ChainedTable, Handle};
pub use config::{AllocPolicy, TableConfig};
pub use error::{Error, Result, ERROR_STATUS};
pub use probing::ProbingCounter;
pub use strategy::{BytesKeys, DeepCopy, FnStrategy, IntKeys, KeyStrategy, StrKeys};
