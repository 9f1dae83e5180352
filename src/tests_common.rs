//! Key generators shared by unit tests, integration tests and benchmarks.

use crate::{insert, AsBytes, NodeArena};
use alloc::{boxed::Box, vec, vec::Vec};
use core::iter;

/// Generate keys of increasing length where no key is a prefix of another.
///
/// The keys are `[255]`, `[0, 255]`, `[0, 0, 255]`, ... up to `max_len`
/// bytes, which produces the deepest possible trie for the number of keys.
pub fn generate_keys_skewed(max_len: usize) -> impl Iterator<Item = Box<[u8]>> {
    iter::successors(Some(vec![u8::MAX; 1].into_boxed_slice()), move |prev| {
        if prev.len() < max_len {
            let mut key = vec![u8::MIN; prev.len()];
            key.push(u8::MAX);
            Some(key.into_boxed_slice())
        } else {
            None
        }
    })
}

/// Generate every key of length `key_len` whose bytes are picked from
/// `value_stops + 1` evenly spaced values.
///
/// The keys come out in lexicographic order.
///
/// # Panics
///
/// Panics if `value_stops` is zero.
pub fn generate_key_fixed_length(
    key_len: usize,
    value_stops: u8,
) -> impl Iterator<Item = Box<[u8]>> {
    assert!(value_stops > 0, "need at least one value stop");

    let step = u8::MAX / value_stops;
    let digits: Vec<u8> = (0..=value_stops).map(|stop| stop * step).collect();
    let num_digits = digits.len();

    iter::successors(Some(vec![0usize; key_len]), move |prev| {
        let mut next = prev.clone();
        for position in (0..key_len).rev() {
            if next[position] + 1 < num_digits {
                next[position] += 1;
                return Some(next);
            }
            next[position] = 0;
        }
        None
    })
    .map(move |indices| {
        indices
            .iter()
            .map(|idx| digits[*idx])
            .collect::<Vec<_>>()
            .into_boxed_slice()
    })
}

/// Generate the keys `[1]`, `[1, 1]`, `[1, 1, 1]`, ... up to `max_len` bytes,
/// where every key is a prefix of all the keys after it.
pub fn generate_key_with_prefixes(max_len: usize) -> impl Iterator<Item = Box<[u8]>> {
    (1..=max_len).map(|len| vec![1u8; len].into_boxed_slice())
}

/// Build a word-like key set from a small alphabet, for example to mimic
/// identifiers that share long prefixes.
///
/// Every key is `stem` followed by one to `suffix_len` bytes from `alphabet`.
pub fn generate_words(stem: &[u8], alphabet: &[u8], suffix_len: usize) -> Vec<Box<[u8]>> {
    let mut words = Vec::new();
    let mut frontier = vec![stem.to_vec()];

    for _ in 0..suffix_len {
        let mut next_frontier = Vec::with_capacity(frontier.len() * alphabet.len());
        for word in &frontier {
            for letter in alphabet {
                let mut next = word.clone();
                next.push(*letter);
                words.push(next.clone().into_boxed_slice());
                next_frontier.push(next);
            }
        }
        frontier = next_frontier;
    }

    words
}

/// Build an arena holding the given entries, inserted in iteration order.
///
/// # Panics
///
/// Panics if any of the keys is empty.
pub fn setup_arena_from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> NodeArena<V>
where
    K: AsBytes,
{
    let mut arena = NodeArena::new();
    for (key, value) in entries {
        insert(&mut arena, key.as_bytes(), value).expect("test keys must not be empty");
    }
    arena
}
