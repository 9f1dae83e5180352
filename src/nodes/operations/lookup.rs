use crate::nodes::{NodeArena, NodeId};
use alloc::{boxed::Box, string::String, vec::Vec};
use core::{fmt, iter::FusedIterator, str};

/// One entry produced by a search: the full key that was resolved by walking
/// the tree, and a reference to the stored value.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchHit<'a, V> {
    /// The full key of the entry, reconstructed from the edge labels
    pub key: Box<[u8]>,
    /// The value stored under `key`
    pub value: &'a V,
}

impl<'a, V> SearchHit<'a, V> {
    /// View the key as UTF-8 text, if it is valid UTF-8.
    pub fn key_str(&self) -> Option<&str> {
        str::from_utf8(&self.key).ok()
    }

    /// Return the key as text, replacing invalid UTF-8 sequences.
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

impl<'a, V: fmt::Debug> fmt::Debug for SearchHit<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchHit")
            .field("key", &crate::nodes::KeyPrefix::from(self.key.as_ref()))
            .field("value", self.value)
            .finish()
    }
}

/// Find the node at which the given key ends exactly.
///
/// The node may not hold a value, for example when the key is a strict prefix
/// of stored keys and the edges happen to split at that point. The empty key
/// resolves to the root.
pub fn find_node<V>(arena: &NodeArena<V>, key: &[u8]) -> Option<NodeId> {
    let mut current = NodeId::ROOT;
    let mut key_bytes_used = 0;

    while key_bytes_used < key.len() {
        let remaining = &key[key_bytes_used..];
        let (_, label, child) = arena[current].find_child(remaining[0])?;
        if !remaining.starts_with(label) {
            return None;
        }

        key_bytes_used += label.len();
        current = child;
    }

    Some(current)
}

/// Find the subtree holding every key that starts with `prefix`.
///
/// Returns the root of that subtree together with the full key leading to it.
/// The returned key may be longer than `prefix` when the prefix ends in the
/// middle of an edge label.
pub fn find_prefix_subtree<V>(arena: &NodeArena<V>, prefix: &[u8]) -> Option<(NodeId, Vec<u8>)> {
    let mut current = NodeId::ROOT;
    let mut key_to_node = Vec::with_capacity(prefix.len());

    loop {
        let remaining = &prefix[key_to_node.len()..];
        let Some(first_byte) = remaining.first() else {
            return Some((current, key_to_node));
        };

        let (_, label, child) = arena[current].find_child(*first_byte)?;
        if remaining.len() >= label.len() {
            // label fully consumed
            if !remaining.starts_with(label) {
                return None;
            }
        } else if !label.starts_with(remaining) {
            return None;
        }

        key_to_node.extend_from_slice(label);
        current = child;

        if key_to_node.len() >= prefix.len() {
            return Some((current, key_to_node));
        }
    }
}

/// Search the tree for the given key.
///
/// With `match_exact` set, the result holds at most the single entry whose key
/// equals `key`. Otherwise, the result holds every entry whose key starts with
/// `key`, in pre-order.
pub fn search<'a, V>(
    arena: &'a NodeArena<V>,
    key: &[u8],
    match_exact: bool,
) -> Vec<SearchHit<'a, V>> {
    if match_exact {
        find_node(arena, key)
            .and_then(|node| arena[node].value.as_ref())
            .map(|value| SearchHit {
                key: Box::from(key),
                value,
            })
            .into_iter()
            .collect()
    } else {
        match find_prefix_subtree(arena, key) {
            Some((node, key_to_node)) => Entries::new(arena, node, key_to_node)
                .map(|(key, value)| SearchHit { key, value })
                .collect(),
            None => Vec::new(),
        }
    }
}

/// A pre-order iterator over the entries of a subtree.
///
/// The value of a node is produced before the entries of its children, and
/// children are visited in their stored order.
pub struct Entries<'a, V> {
    arena: &'a NodeArena<V>,
    /// The start node, which is handled first and whose key is already in
    /// `key_buffer`
    start: Option<NodeId>,
    /// Pending nodes, with the length of their parent key
    stack: Vec<(NodeId, usize)>,
    key_buffer: Vec<u8>,
}

impl<'a, V> Entries<'a, V> {
    /// Create an iterator over the subtree at `start`, where `key_to_start` is
    /// the full key leading to `start`.
    pub fn new(arena: &'a NodeArena<V>, start: NodeId, key_to_start: Vec<u8>) -> Self {
        Entries {
            arena,
            start: Some(start),
            stack: Vec::new(),
            key_buffer: key_to_start,
        }
    }

    /// Create an iterator which yields nothing.
    pub fn empty(arena: &'a NodeArena<V>) -> Self {
        Entries {
            arena,
            start: None,
            stack: Vec::new(),
            key_buffer: Vec::new(),
        }
    }

    fn push_children(&mut self, node: NodeId) {
        let parent_key_len = self.key_buffer.len();
        self.stack.extend(
            self.arena[node]
                .children
                .iter()
                .rev()
                .map(|(_, child)| (*child, parent_key_len)),
        );
    }
}

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = (Box<[u8]>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;

        if let Some(start) = self.start.take() {
            self.push_children(start);
            if let Some(value) = arena[start].value.as_ref() {
                return Some((Box::from(self.key_buffer.as_slice()), value));
            }
        }

        while let Some((node, parent_key_len)) = self.stack.pop() {
            self.key_buffer.truncate(parent_key_len);
            let current = &arena[node];
            if let Some(label) = current.key_on_parent.as_deref() {
                self.key_buffer.extend_from_slice(label);
            }
            self.push_children(node);

            if let Some(value) = current.value.as_ref() {
                return Some((Box::from(self.key_buffer.as_slice()), value));
            }
        }

        None
    }
}

impl<'a, V> FusedIterator for Entries<'a, V> {}

#[cfg(test)]
mod tests;
