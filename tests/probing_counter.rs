use keyed_tables::{Error, IntKeys, ProbingCounter, StrKeys, TableConfig};
use proptest::prelude::*;
use std::collections::HashMap;

#[test]
fn word_counts_in_slot_order() {
    let mut c = ProbingCounter::new(TableConfig::new(16), StrKeys).unwrap();
    for w in "the quick the fox the".split_whitespace() {
        c.increment(w).unwrap();
    }
    let mut visited = Vec::new();
    c.for_each_occupied(|k, n| visited.push((k.to_string(), n)));
    assert_eq!(visited.len(), 3);
    visited.sort();
    assert_eq!(
        visited,
        vec![
            ("fox".to_string(), 1),
            ("quick".to_string(), 1),
            ("the".to_string(), 3)
        ]
    );
}

#[test]
fn capacity_equal_to_distinct_keys() {
    let keys: Vec<String> = (0..64).map(|i| format!("w{i}")).collect();
    let mut c = ProbingCounter::new(TableConfig::new(keys.len()), StrKeys).unwrap();
    for k in &keys {
        assert_eq!(c.increment(k).unwrap(), 1);
    }
    assert!(c.is_full());
    assert!(matches!(
        c.increment("one-too-many"),
        Err(Error::CapacityExhausted { capacity: 64 })
    ));
    for k in &keys {
        assert_eq!(c.count(k), Some(1));
    }
}

proptest! {
    // Invariants: counts equal the number of increments per key; one slot
    // per distinct key; total equals the number of increments.
    #[test]
    fn prop_counts_match_model(values in proptest::collection::vec(-20i32..20, 0..200), slack in 0usize..8) {
        let mut model: HashMap<i32, u64> = HashMap::new();
        for v in &values {
            *model.entry(*v).or_default() += 1;
        }
        let cap = (model.len() + slack).max(1);
        let mut c = ProbingCounter::new(TableConfig::new(cap), IntKeys).unwrap();
        for v in &values {
            c.increment(v).unwrap();
        }
        prop_assert_eq!(c.len(), model.len());
        prop_assert_eq!(c.total(), values.len() as u64);
        let mut seen = HashMap::new();
        c.for_each_occupied(|k, n| { seen.insert(*k, n); });
        prop_assert_eq!(seen, model);
    }
}
