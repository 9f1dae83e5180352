use crate::{
    find_node, find_prefix_subtree, search,
    tests_common::{generate_key_with_prefixes, generate_words, setup_arena_from_entries},
    Entries, NodeArena, NodeId, SearchHit,
};
use alloc::{boxed::Box, string::String, vec::Vec};

fn hit_pairs<'a>(hits: &[SearchHit<'a, &'static str>]) -> Vec<(String, &'static str)> {
    hits.iter().map(|hit| (hit.key_lossy(), *hit.value)).collect()
}

fn scenario_arena() -> NodeArena<&'static str> {
    setup_arena_from_entries([
        ("AA-AA", "AA-AA"),
        ("AA-AB", "AA-AB"),
        ("BB-AA", "BB-AA"),
        ("BB-AB", "BB-AB"),
    ])
}

#[test]
fn search_empty_tree() {
    let arena = NodeArena::<u8>::new();

    assert!(search(&arena, b"anything", true).is_empty());
    assert!(search(&arena, b"anything", false).is_empty());
    assert!(search(&arena, b"", true).is_empty());
    assert!(search(&arena, b"", false).is_empty());
}

#[test]
fn search_scenario_prefix_and_exact() {
    let arena = scenario_arena();

    assert_eq!(
        hit_pairs(&search(&arena, b"AA", false)),
        [
            (String::from("AA-AA"), "AA-AA"),
            (String::from("AA-AB"), "AA-AB")
        ]
    );
    assert_eq!(
        hit_pairs(&search(&arena, b"AA-AA", true)),
        [(String::from("AA-AA"), "AA-AA")]
    );
    assert_eq!(search(&arena, b"", false).len(), 4);
}

#[test]
fn search_exact_requires_full_match() {
    let arena = scenario_arena();

    // prefix of an edge label
    assert!(search(&arena, b"AA", true).is_empty());
    // ends exactly at a valueless split node
    assert!(search(&arena, b"AA-A", true).is_empty());
    // same length as the edge, different content
    assert!(search(&arena, b"AA-AC", true).is_empty());
    assert!(search(&arena, b"AX-AA", true).is_empty());
    // longer than any stored key
    assert!(search(&arena, b"AA-AAA", true).is_empty());
    // no edge with the first byte
    assert!(search(&arena, b"CC", true).is_empty());
    // the root is not an entry
    assert!(search(&arena, b"", true).is_empty());
}

#[test]
fn search_prefix_verifies_edge_content() {
    let arena = scenario_arena();

    // shares a first byte with the "AA-A" edge but diverges inside of it
    assert!(search(&arena, b"AB", false).is_empty());
    assert!(search(&arena, b"AA-X", false).is_empty());
    // runs past the end of a stored key
    assert!(search(&arena, b"AA-AAX", false).is_empty());

    // a prefix ending in the middle of an edge yields the whole subtree
    let hits = search(&arena, b"B", false);
    assert_eq!(
        hit_pairs(&hits),
        [
            (String::from("BB-AA"), "BB-AA"),
            (String::from("BB-AB"), "BB-AB")
        ]
    );

    // a prefix that is a whole key yields that one entry
    assert_eq!(search(&arena, b"BB-AB", false).len(), 1);
}

#[test]
fn search_prefix_includes_value_at_inner_node() {
    let arena = setup_arena_from_entries([("AA", 1), ("AA-AA", 2), ("AA-AB", 3), ("AB", 4)]);

    let hits = search(&arena, b"AA", false);
    let keys: Vec<_> = hits.iter().map(|hit| hit.key.clone()).collect();
    assert_eq!(
        keys,
        [
            Box::from(&b"AA"[..]),
            Box::from(&b"AA-AA"[..]),
            Box::from(&b"AA-AB"[..])
        ]
    );
    let values: Vec<_> = hits.iter().map(|hit| *hit.value).collect();
    assert_eq!(values, [1, 2, 3]);

    assert_eq!(search(&arena, b"A", false).len(), 4);
    assert_eq!(search(&arena, b"AA", true).len(), 1);
    assert_eq!(*search(&arena, b"AB", true)[0].value, 4);
}

#[test]
fn find_node_and_prefix_subtree() {
    let arena = scenario_arena();

    assert_eq!(find_node(&arena, b""), Some(NodeId::ROOT));
    let split = find_node(&arena, b"AA-A").unwrap();
    assert_eq!(arena[split].value(), None);
    assert_eq!(arena[split].num_children(), 2);
    assert_eq!(find_node(&arena, b"AA-"), None);

    assert_eq!(
        find_prefix_subtree(&arena, b"AA-"),
        Some((split, b"AA-A".to_vec()))
    );
    assert_eq!(
        find_prefix_subtree(&arena, b"AA-A"),
        Some((split, b"AA-A".to_vec()))
    );
    assert_eq!(
        find_prefix_subtree(&arena, b""),
        Some((NodeId::ROOT, Vec::new()))
    );
    assert_eq!(find_prefix_subtree(&arena, b"AA-B"), None);
}

#[test]
fn entries_iterate_in_pre_order() {
    let words = generate_words(b"w", b"xyz", 3);
    let arena = setup_arena_from_entries(words.iter().enumerate().map(|(idx, word)| (word, idx)));

    let entries: Vec<_> = Entries::new(&arena, NodeId::ROOT, Vec::new()).collect();
    assert_eq!(entries.len(), words.len());

    // every key reconstructed from edge labels is a stored key with its value
    for (key, value) in &entries {
        assert_eq!(&words[**value], key);
    }

    // a node's own value comes before the values of its descendants
    for (position, (key, _)) in entries.iter().enumerate() {
        for (later_key, _) in &entries[position + 1..] {
            assert!(!key.starts_with(later_key) || key == later_key);
        }
    }

    let mut fused = Entries::empty(&arena);
    assert!(fused.next().is_none());
    assert!(fused.next().is_none());
}

#[test]
fn search_nested_prefix_keys() {
    let keys: Vec<_> = generate_key_with_prefixes(6).collect();
    let arena = setup_arena_from_entries(keys.iter().enumerate().map(|(idx, key)| (key, idx)));

    for (idx, key) in keys.iter().enumerate() {
        let exact = search(&arena, key, true);
        assert_eq!(exact.len(), 1);
        assert_eq!(*exact[0].value, idx);
        assert_eq!(&exact[0].key, key);

        let prefixed: Vec<_> = search(&arena, key, false)
            .into_iter()
            .map(|hit| *hit.value)
            .collect();
        assert_eq!(prefixed, (idx..keys.len()).collect::<Vec<_>>());
    }
}

#[test]
fn search_hit_key_views() {
    let arena = setup_arena_from_entries([(&b"ok"[..], 1), (&b"\xffbad"[..], 2)]);

    let hits = search(&arena, b"ok", true);
    assert_eq!(hits[0].key_str(), Some("ok"));

    let hits = search(&arena, b"\xff", false);
    assert_eq!(hits[0].key_str(), None);
    assert_eq!(hits[0].key_lossy(), "\u{fffd}bad");
    assert_eq!(
        alloc::format!("{:?}", hits[0]),
        "SearchHit { key: \"\\xffbad\", value: 2 }"
    );
}
