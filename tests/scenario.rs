use compact_radix::{visitor::WellFormedChecker, InsertError, RadixTrie};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn sorted_keys(trie: &RadixTrie<String>, key: &str, match_exact: bool) -> Vec<String> {
    let mut keys: Vec<_> = trie
        .search(key, match_exact)
        .iter()
        .map(|hit| hit.key_lossy())
        .collect();
    keys.sort();
    keys
}

#[test]
fn four_keys_with_shared_prefixes() {
    let mut trie = RadixTrie::new();
    for key in ["AA-AA", "AA-AB", "BB-AA", "BB-AB"] {
        assert_eq!(trie.insert(key, key.to_string()), Ok(None));
    }
    assert_eq!(trie.count(), 4);

    assert_eq!(sorted_keys(&trie, "AA", false), ["AA-AA", "AA-AB"]);
    assert_eq!(sorted_keys(&trie, "AA-AA", true), ["AA-AA"]);
    assert!(trie.search("AA", true).is_empty());

    // root -> {"AA-A", "BB-A"}, each with two leaf children
    let root = trie.root();
    assert_eq!(root.num_children(), 2);
    for (label, child) in root.children() {
        assert_eq!(label.len(), 4);
        assert_eq!(child.value(), None);
        assert_eq!(child.num_children(), 2);
    }

    assert_eq!(trie.delete("AA-AA", true), Ok(1));
    assert!(trie.search("AA-AA", true).is_empty());
    assert_eq!(sorted_keys(&trie, "AA-AB", true), ["AA-AB"]);

    // "AA-A" merged with the remaining "B" edge
    let labels: Vec<_> = trie
        .root()
        .children()
        .map(|(label, _)| label.to_vec())
        .collect();
    assert_eq!(labels, [b"AA-AB".to_vec(), b"BB-A".to_vec()]);
    assert_eq!(WellFormedChecker::check(&trie), Ok(5));

    assert_eq!(trie.delete("BB", false), Ok(2));
    assert_eq!(sorted_keys(&trie, "", false), ["AA-AB"]);
    assert_eq!(trie.count(), 4);
    assert_eq!(trie.len(), 1);
}

#[test]
fn empty_key_is_rejected() {
    let mut trie = RadixTrie::new();
    assert_eq!(trie.insert("", 1), Err(InsertError::EmptyKey));
    assert_eq!(trie.count(), 0);
    assert!(trie.is_empty());
}

#[test]
fn shuffled_insert_and_delete_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut words: Vec<String> = [
        "app",
        "apple",
        "application",
        "apply",
        "ape",
        "b",
        "banana",
        "band",
        "bandana",
        "can",
        "candle",
        "cane",
    ]
    .iter()
    .map(|word| word.to_string())
    .collect();

    for _ in 0..20 {
        words.shuffle(&mut rng);
        let mut trie = RadixTrie::new();
        for word in &words {
            trie.insert(word, word.clone()).unwrap();
        }
        assert_eq!(trie.len(), words.len());
        WellFormedChecker::check(&trie).unwrap();

        for word in &words {
            assert_eq!(trie.get(word), Some(word));
        }

        words.shuffle(&mut rng);
        for (removed, word) in words.iter().enumerate() {
            assert_eq!(trie.remove(word).unwrap().as_ref(), Some(word));
            assert_eq!(trie.len(), words.len() - removed - 1);
            WellFormedChecker::check(&trie).unwrap();
            for remaining in &words[removed + 1..] {
                assert!(trie.contains_key(remaining));
            }
        }

        assert!(trie.is_empty());
        assert_eq!(trie.count(), words.len());
        assert_eq!(WellFormedChecker::check(&trie), Ok(1));
    }
}
