#[cfg(feature = "tracing")]
use crate::nodes::KeyPrefix;
use crate::{
    nodes::{common_prefix_len, Node, NodeArena, NodeId},
    tracing_helpers::{trace_log, warn_log},
};
use alloc::boxed::Box;
use core::fmt;

/// The results of a successful tree insert
#[derive(Debug)]
pub struct InsertResult<V> {
    /// The node that now holds the inserted value
    pub node: NodeId,
    /// The value previously stored under the same key, if present
    pub existing_value: Option<V>,
}

/// An error from inserting a key into the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The inserted key had no bytes. The root of the trie stands for the
    /// empty key and never stores a value.
    EmptyKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::EmptyKey => {
                write!(f, "Attempted to insert an empty key, keys must have at least one byte")
            },
        }
    }
}

impl core::error::Error for InsertError {}

/// This enum describes where and how a key will be attached to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertPoint {
    /// The node at `parent` has no edge starting with the next key byte, so the
    /// rest of the key becomes a new leaf edge under it.
    NewChild {
        /// The node that receives the new edge
        parent: NodeId,
        /// The number of key bytes consumed by the edges above `parent`
        key_bytes_used: usize,
    },
    /// The whole key is already spelled out by the edges from the root to
    /// `node`, the value is written there.
    Existing {
        /// The node the key ends at
        node: NodeId,
    },
    /// The rest of the key diverges from (or ends inside of) an existing edge.
    /// The edge is split at the point of divergence.
    Split {
        /// The node that owns the edge being split
        parent: NodeId,
        /// Position of the edge in the children of `parent`
        edge_index: usize,
        /// Number of label bytes shared with the rest of the key
        matched: usize,
        /// The number of key bytes consumed by the edges above `parent`
        key_bytes_used: usize,
    },
}

/// Walk the tree and find the point where the given key would be inserted.
///
/// The key must not be empty.
pub(crate) fn search_for_insert_point<V>(arena: &NodeArena<V>, key: &[u8]) -> InsertPoint {
    debug_assert!(!key.is_empty(), "insert key must not be empty");

    let mut current = NodeId::ROOT;
    let mut key_bytes_used = 0;

    loop {
        let remaining = &key[key_bytes_used..];
        let node = &arena[current];

        let Some((edge_index, label, child)) =
            remaining.first().and_then(|byte| node.find_child(*byte))
        else {
            return InsertPoint::NewChild {
                parent: current,
                key_bytes_used,
            };
        };

        let matched = common_prefix_len(label, remaining);
        if matched < label.len() {
            return InsertPoint::Split {
                parent: current,
                edge_index,
                matched,
                key_bytes_used,
            };
        }

        if matched == remaining.len() {
            return InsertPoint::Existing { node: child };
        }

        // The edge is fully consumed, the boundary of the next segment is
        // exactly the label length.
        key_bytes_used += label.len();
        current = child;
    }
}

impl InsertPoint {
    /// Use the [`InsertPoint`] information to write the given key and value
    /// into the tree.
    ///
    /// The insert point must have been computed for the same `key` against the
    /// current state of `arena`.
    pub(crate) fn apply<V>(
        self,
        arena: &mut NodeArena<V>,
        key: &[u8],
        value: V,
    ) -> InsertResult<V> {
        match self {
            InsertPoint::NewChild {
                parent,
                key_bytes_used,
            } => {
                let label = &key[key_bytes_used..];
                let node = attach_new_child(arena, parent, label, Some(value));
                trace_log!(
                    parent = %parent,
                    node = %node,
                    label = ?KeyPrefix::from(label),
                    "attached new leaf"
                );
                InsertResult {
                    node,
                    existing_value: None,
                }
            },
            InsertPoint::Existing { node } => {
                let existing_value = arena[node].value.replace(value);
                trace_log!(
                    node = %node,
                    overwritten = existing_value.is_some(),
                    "wrote value to existing node"
                );
                InsertResult {
                    node,
                    existing_value,
                }
            },
            InsertPoint::Split {
                parent,
                edge_index,
                matched,
                key_bytes_used,
            } => {
                let node = split_edge(arena, parent, edge_index, matched, key, key_bytes_used, value);
                InsertResult {
                    node,
                    existing_value: None,
                }
            },
        }
    }
}

/// Insert the given key and value into the tree, returning the node holding
/// the value and the previous value if the key was already present.
///
/// # Errors
///
///  - Returns [`InsertError::EmptyKey`] if the key has no bytes, the tree is
///    left unchanged.
///
/// # Examples
///
/// ```rust
/// use compact_radix::{insert, NodeArena};
///
/// let mut arena = NodeArena::new();
/// let result = insert(&mut arena, b"AA-AA", 1).unwrap();
/// assert_eq!(result.existing_value, None);
/// assert_eq!(arena.root().child(b"AA-AA").map(|leaf| leaf.id()), Some(result.node));
/// ```
///
/// The insert point search and its application are internal, since applying
/// an insert point to a different key than it was computed for would corrupt
/// the tree:
///
/// ```rust,compile_fail
/// use compact_radix::{search_for_insert_point, NodeArena};
///
/// let arena = NodeArena::<u8>::new();
/// let _ = search_for_insert_point(&arena, b"AA");
/// ```
pub fn insert<V>(
    arena: &mut NodeArena<V>,
    key: &[u8],
    value: V,
) -> Result<InsertResult<V>, InsertError> {
    if key.is_empty() {
        warn_log!("rejected empty insert key");
        return Err(InsertError::EmptyKey);
    }

    let insert_point = search_for_insert_point(arena, key);
    Ok(insert_point.apply(arena, key, value))
}

fn attach_new_child<V>(
    arena: &mut NodeArena<V>,
    parent: NodeId,
    label: &[u8],
    value: Option<V>,
) -> NodeId {
    let child = arena.allocate(Node::new_child(parent, label, value));
    arena[parent].children.push((Box::from(label), child));
    child
}

/// Split the edge at `edge_index` of `parent` after `matched` bytes.
///
/// A new inner node takes the place of the old edge, labelled with the shared
/// bytes. The old child moves under it with the rest of its label. If the key
/// continues past the shared bytes, a new leaf holds the value, otherwise the
/// new inner node itself does.
fn split_edge<V>(
    arena: &mut NodeArena<V>,
    parent: NodeId,
    edge_index: usize,
    matched: usize,
    key: &[u8],
    key_bytes_used: usize,
    value: V,
) -> NodeId {
    debug_assert!(matched > 0, "split requires a shared first byte");

    let (old_label, old_child) = {
        let (label, child) = &arena[parent].children[edge_index];
        (label.clone(), *child)
    };
    debug_assert!(matched < old_label.len(), "split must happen inside of the label");

    let shared = &old_label[..matched];
    let old_rest = &old_label[matched..];
    let new_rest = &key[key_bytes_used + matched..];

    let split_node = arena.allocate(Node::new_child(parent, shared, None));
    arena[parent].children[edge_index] = (Box::from(shared), split_node);

    {
        let old_child_node = &mut arena[old_child];
        old_child_node.parent = Some(split_node);
        old_child_node.key_on_parent = Some(Box::from(old_rest));
    }
    arena[split_node]
        .children
        .push((Box::from(old_rest), old_child));

    let target = if new_rest.is_empty() {
        arena[split_node].value = Some(value);
        split_node
    } else {
        attach_new_child(arena, split_node, new_rest, Some(value))
    };

    trace_log!(
        parent = %parent,
        split_node = %split_node,
        shared = ?KeyPrefix::from(shared),
        old_rest = ?KeyPrefix::from(old_rest),
        new_rest = ?KeyPrefix::from(new_rest),
        "split edge"
    );

    target
}
