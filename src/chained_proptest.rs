#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can check
// chain lengths against the live-entry count.

use crate::chained::{ChainedTable, Handle};
use crate::config::TableConfig;
use crate::strategy::{FnStrategy, KeyStrategy, StrKeys};
use core::cmp::Ordering;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Has(String),
    Remove(usize),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=8, proptest::collection::vec("[a-z]{0,4}", 1..=8)).prop_flat_map(|(cap, pool)| {
        let idx = proptest::sample::select((0..pool.len()).collect::<Vec<_>>());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => "[a-z]{0,4}".prop_map(Op::Has),
            2 => idx.clone().prop_map(Op::Remove),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

fn colliding() -> FnStrategy<str> {
    fn zero(_: &str) -> u32 {
        0
    }
    fn cmp(a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
    FnStrategy::new(zero, cmp)
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised after every op:
// - put inserts or updates; never two entries for one key.
// - get/has_key agree with the model; remove returns the model's value.
// - len() equals the model's len and the sum of chain lengths.
// - handles for live keys stay stable; handles of removed keys stay stale.
fn run_scenario<S>(strategy: S, cap: usize, pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError>
where
    S: KeyStrategy<Key = str>,
{
    let mut sut: ChainedTable<S, i32> =
        ChainedTable::new(TableConfig::new(cap), strategy).expect("table");
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                let prev = sut.put(k, v).expect("put");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                if let Some(h) = sut.find(k) {
                    prop_assert_eq!(Some(h), sut.find(k), "handle must be stable");
                    prop_assert_eq!(h.key(&sut), Some(k.as_str()));
                }
            }
            Op::Has(s) => {
                prop_assert_eq!(sut.has_key(&s), model.contains_key(&s));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let h = sut.find(k);
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.has_key(k));
                stale.extend(h);
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.wrapping_add(d);
                    let mv = model.get_mut(k).expect("model has key");
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            Op::Iterate => {
                let s_pairs: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                let m_pairs: BTreeSet<(String, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(sut.iter().count(), s_pairs.len(), "no duplicate entries");
                prop_assert_eq!(s_pairs, m_pairs);
            }
            Op::Clear => {
                stale.extend(model.keys().filter_map(|k| sut.find(k)));
                sut.clear();
                model.clear();
            }
        }

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let chained: usize = (0..sut.capacity()).filter_map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(chained, sut.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        run_scenario(StrKeys, cap, &pool, ops)?;
    }

    // Every key hashes to bucket 0: one long chain, equality does all the work.
    #[test]
    fn prop_state_machine_with_collisions((cap, pool, ops) in arb_scenario()) {
        run_scenario(colliding(), cap, &pool, ops)?;
    }
}
