use keyed_tables::{ChainedTable, Error, FnStrategy, IntKeys, StrKeys, TableConfig};
use std::cmp::Ordering;

#[test]
fn int_keys_with_char_values() {
    let mut t = ChainedTable::new(TableConfig::new(4), IntKeys).expect("table");
    for (k, v) in [(4, 'a'), (8, 'b'), (4, 'c'), (12, 'd')] {
        t.put(&k, v).unwrap();
    }
    assert_eq!(t.size(), 3);
    assert_eq!(t.get(&4), Some(&'c'));
    assert_eq!(t.get(&8), Some(&'b'));
    assert_eq!(t.get(&12), Some(&'d'));
    assert!(!t.has_key(&99));
    assert_eq!(t.get(&99), None);
}

#[test]
fn string_keys_borrowed_values() {
    let definitions = vec![
        "a small domesticated carnivore".to_string(),
        "a loyal companion".to_string(),
    ];
    let mut t: ChainedTable<StrKeys, &String> =
        ChainedTable::new(TableConfig::new(7), StrKeys).unwrap();
    t.put("cat", &definitions[0]).unwrap();
    t.put("dog", &definitions[1]).unwrap();
    assert_eq!(t.get("dog").map(|s| s.as_str()), Some("a loyal companion"));
    assert_eq!(t.remove("cat"), Some(&definitions[0]));
    assert_eq!(t.len(), 1);
    drop(t);
    assert_eq!(definitions.len(), 2);
}

#[test]
fn caller_supplied_function_pair() {
    fn by_len(k: &str) -> u32 {
        k.len() as u32
    }
    fn case_insensitive(a: &str, b: &str) -> Ordering {
        a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
    }
    let strategy = FnStrategy::<str>::new(by_len, case_insensitive);
    let mut t = ChainedTable::new(TableConfig::new(3), strategy).unwrap();
    t.put("Hello", 1).unwrap();
    assert_eq!(t.put("hello", 2).unwrap(), Some(1));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("HELLO"), Some(&2));
    // Stored key is the first spelling seen.
    assert_eq!(t.iter().next().map(|(k, _)| k), Some("Hello"));
}

#[test]
fn many_keys_in_few_buckets() {
    let mut t = ChainedTable::new(TableConfig::new(3), IntKeys).unwrap();
    for k in -500..500 {
        t.put(&k, k * 10).unwrap();
    }
    assert_eq!(t.len(), 1000);
    for k in (-500..500).filter(|k| k % 2 == 0) {
        assert_eq!(t.remove(&k), Some(k * 10));
    }
    assert_eq!(t.len(), 500);
    for k in -500..500 {
        assert_eq!(t.has_key(&k), k % 2 != 0);
    }
    let total: usize = (0..3).map(|b| t.chain_len(b).unwrap()).sum();
    assert_eq!(total, 500);
}

#[test]
fn construction_errors() {
    assert!(matches!(
        ChainedTable::<IntKeys, ()>::new(TableConfig::new(0), IntKeys),
        Err(Error::ZeroCapacity)
    ));
    assert!(matches!(
        ChainedTable::<IntKeys, ()>::new(TableConfig::new(usize::MAX), IntKeys),
        Err(Error::Alloc { .. })
    ));
}
