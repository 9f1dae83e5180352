use compact_radix::{
    tests_common::{generate_key_fixed_length, generate_key_with_prefixes, generate_words},
    RadixTrie,
};

/// Keys that look like identifiers sharing a stem, for example `radix_ab`.
pub fn word_keys() -> Vec<Box<[u8]>> {
    generate_words(b"radix_", b"abcdefgh", 4)
}

/// Every key of length 4 over 5 evenly spaced byte values.
pub fn fixed_length_keys() -> Vec<Box<[u8]>> {
    generate_key_fixed_length(4, 4).collect()
}

pub fn build_tree(keys: &[Box<[u8]>]) -> RadixTrie<usize> {
    let mut tree = RadixTrie::new();
    for (idx, key) in keys.iter().enumerate() {
        tree.insert(key, idx).unwrap();
    }
    tree
}

pub fn words_tree() -> RadixTrie<usize> {
    build_tree(&word_keys())
}

pub fn with_prefixes_tree() -> RadixTrie<usize> {
    let keys: Vec<_> = generate_key_with_prefixes(u8::MAX as usize).collect();
    build_tree(&keys)
}
