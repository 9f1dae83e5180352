#![no_main]

use compact_radix::{visitor::WellFormedChecker, InsertError, RadixTrie};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
enum Action {
    Clear,
    ContainsKey(Box<[u8]>),
    GetKey(Box<[u8]>),
    CheckLen,
    CheckIter,
    Insert(Box<[u8]>),
    Remove(Box<[u8]>),
    DeletePrefix(Box<[u8]>),
    Search { key: Box<[u8]>, match_exact: bool },
    Clone,
}

libfuzzer_sys::fuzz_target!(|actions: Vec<Action>| {
    let mut trie = RadixTrie::<u32>::new();
    let mut oracle = BTreeMap::<Box<[u8]>, u32>::new();
    let mut next_value = 0;
    let mut inserts = 0;

    for action in actions {
        match action {
            Action::Clear => {
                trie.clear();
                oracle.clear();
            },
            Action::ContainsKey(key) => {
                assert_eq!(trie.contains_key(&key), oracle.contains_key(&key));
            },
            Action::GetKey(key) => {
                let entry = trie.get_mut(&key);
                assert_eq!(entry, oracle.get_mut(&key));
                if let Some(value) = entry {
                    *value = value.saturating_sub(1);
                }
            },
            Action::CheckLen => {
                assert_eq!(trie.len(), oracle.len());
                assert_eq!(trie.is_empty(), oracle.is_empty());
            },
            Action::CheckIter => {
                let mut entries: Vec<_> = trie.iter().map(|(key, value)| (key, *value)).collect();
                entries.sort();
                assert!(entries
                    .iter()
                    .map(|(key, value)| (key, value))
                    .eq(oracle.iter()));
            },
            Action::Insert(key) => {
                let value = next_value;
                next_value += 1;

                let result = trie.insert(&key, value);
                if key.is_empty() {
                    assert_eq!(result, Err(InsertError::EmptyKey));
                } else {
                    assert_eq!(result, Ok(oracle.insert(key, value)));
                    inserts += 1;
                }
            },
            Action::Remove(key) => {
                assert_eq!(trie.remove(&key), Ok(oracle.remove(&key)));
            },
            Action::DeletePrefix(prefix) => {
                let before = oracle.len();
                oracle.retain(|key, _| !key.starts_with(&prefix));
                assert_eq!(trie.delete(&prefix, false), Ok(before - oracle.len()));
            },
            Action::Search { key, match_exact } => {
                let mut found: Vec<_> = trie
                    .search(&key, match_exact)
                    .into_iter()
                    .map(|hit| (hit.key, *hit.value))
                    .collect();
                found.sort();

                let expected: Vec<_> = oracle
                    .iter()
                    .filter(|(stored, _)| {
                        if match_exact {
                            **stored == *key
                        } else {
                            stored.starts_with(&key)
                        }
                    })
                    .map(|(stored, value)| (stored.clone(), *value))
                    .collect();
                assert_eq!(found, expected);
            },
            Action::Clone => {
                trie = trie.clone();
            },
        }

        assert_eq!(trie.count(), inserts);
    }

    WellFormedChecker::check(&trie).unwrap();
});
