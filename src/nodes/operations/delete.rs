use crate::{
    nodes::{find_node, KeyPrefix, NodeArena, NodeId},
    tracing_helpers::{debug_log, error_log, trace_log},
};
use alloc::{boxed::Box, vec::Vec};
use core::fmt;

/// The tree structure around a node did not satisfy the invariants that
/// delete relies on to re-link the tree.
///
/// These errors indicate a bug in the tree operations, not a missing key. The
/// operation that returned the error is abandoned at the point the problem was
/// found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    /// A non-root node had no parent link
    MissingParent {
        /// The node being compressed
        node: NodeId,
        /// The key that was being deleted
        key: KeyPrefix,
    },
    /// A non-root node had no label for the edge leading to it
    MissingKeyOnParent {
        /// The node being compressed
        node: NodeId,
        /// The key that was being deleted
        key: KeyPrefix,
    },
    /// The parent of a node had no edge with the node's label pointing back
    /// to the node
    KeyOnParentNotMapped {
        /// The node being compressed or removed
        node: NodeId,
        /// The parent the node claimed to be under
        parent: NodeId,
        /// The key that was being deleted
        key: KeyPrefix,
    },
    /// A node without a value did not have the number of children required
    /// to restore compression
    WrongChildrenCount {
        /// The node being compressed
        node: NodeId,
        /// The number of children found on the node
        num_children: usize,
        /// The key that was being deleted
        key: KeyPrefix,
    },
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteError::MissingParent { node, key } => write!(
                f,
                "Node [{node}] has no parent defined while deleting key [{key:?}]"
            ),
            DeleteError::MissingKeyOnParent { node, key } => write!(
                f,
                "Node [{node}] has no key on parent defined while deleting key [{key:?}]"
            ),
            DeleteError::KeyOnParentNotMapped { node, parent, key } => write!(
                f,
                "Node [{node}] is not mapped by its key on parent [{parent}] while deleting key \
                 [{key:?}]"
            ),
            DeleteError::WrongChildrenCount {
                node,
                num_children,
                key,
            } => write!(
                f,
                "Node [{node}] without a value has [{num_children}] children while deleting key \
                 [{key:?}], expected exactly one child to merge or at least two to keep"
            ),
        }
    }
}

impl core::error::Error for DeleteError {}

/// Delete the entry whose key is exactly `key`, returning its value.
///
/// A leaf is removed from the tree entirely, while a node that still has
/// children only loses its value. Afterwards the affected node is merged with
/// its remaining child if it no longer needs to exist on its own.
///
/// Deleting a key that is not stored, including a key that only exists as a
/// strict prefix of stored keys, changes nothing and returns `Ok(None)`.
///
/// # Errors
///
/// Returns a [`DeleteError`] if the nodes around the deleted entry have
/// inconsistent parent links or children.
pub fn delete_exact<V>(arena: &mut NodeArena<V>, key: &[u8]) -> Result<Option<V>, DeleteError> {
    let Some(node) = find_node(arena, key) else {
        return Ok(None);
    };
    if node.is_root() || arena[node].value.is_none() {
        return Ok(None);
    }

    if !arena[node].is_leaf() {
        let value = arena[node].value.take();
        trace_log!(node = %node, "removed value from inner node");
        restore_compression(arena, node, key)?;
        return Ok(value);
    }

    let parent = detach_from_parent(arena, node, key)?;
    let value = arena.free(node).and_then(|removed| removed.value);
    trace_log!(node = %node, parent = %parent, "removed leaf");

    restore_compression(arena, parent, key)?;

    Ok(value)
}

/// Delete every entry whose key starts with `prefix`, returning how many
/// entries were removed.
///
/// Only the subtree below the point where `prefix` is used up is removed, even
/// when `prefix` ends exactly at the end of an edge label. An empty prefix
/// removes everything.
///
/// # Errors
///
/// Returns a [`DeleteError`] if the nodes around the removed subtree have
/// inconsistent parent links or children.
pub fn delete_prefix<V>(arena: &mut NodeArena<V>, prefix: &[u8]) -> Result<usize, DeleteError> {
    if prefix.is_empty() {
        let removed = clear_children(arena, NodeId::ROOT);
        debug_log!(removed, "removed all entries");
        return Ok(removed);
    }

    let mut current = NodeId::ROOT;
    let mut key_bytes_used = 0;

    loop {
        let remaining = &prefix[key_bytes_used..];
        let Some((edge_index, label, child)) = arena[current].find_child(remaining[0]) else {
            return Ok(0);
        };

        if remaining.len() > label.len() {
            if !remaining.starts_with(label) {
                return Ok(0);
            }
            key_bytes_used += label.len();
            current = child;
            continue;
        }

        if !label.starts_with(remaining) {
            return Ok(0);
        }

        arena[current].children.remove(edge_index);
        let removed = arena.free_subtree(child);
        debug_log!(
            parent = %current,
            subtree = %child,
            removed,
            "removed subtree"
        );

        restore_compression(arena, current, prefix)?;

        return Ok(removed);
    }
}

/// Remove every child of the given node, returning the number of values that
/// were dropped.
pub(crate) fn clear_children<V>(arena: &mut NodeArena<V>, node: NodeId) -> usize {
    let children: Vec<_> = arena[node].children.drain(..).map(|(_, child)| child).collect();
    children
        .into_iter()
        .map(|child| arena.free_subtree(child))
        .sum()
}

/// Remove the edge pointing at `node` from its parent, returning the parent.
fn detach_from_parent<V>(
    arena: &mut NodeArena<V>,
    node: NodeId,
    key: &[u8],
) -> Result<NodeId, DeleteError> {
    let parent = arena[node].parent.ok_or_else(|| {
        error_log!(node = %node, "node has no parent");
        DeleteError::MissingParent {
            node,
            key: KeyPrefix::from(key),
        }
    })?;

    let position = arena[parent].child_position(node).ok_or_else(|| {
        error_log!(node = %node, parent = %parent, "node is not a child of its parent");
        DeleteError::KeyOnParentNotMapped {
            node,
            parent,
            key: KeyPrefix::from(key),
        }
    })?;

    arena[parent].children.remove(position);
    Ok(parent)
}

/// Check whether `node` is still required after one of its children or its
/// value was removed, and merge it with its single remaining child if it is
/// not.
///
/// The root, and any node holding a value, is always kept. A node without a
/// value needs at least two children to be kept.
fn restore_compression<V>(
    arena: &mut NodeArena<V>,
    node: NodeId,
    key: &[u8],
) -> Result<(), DeleteError> {
    if node.is_root() || arena[node].value.is_some() {
        return Ok(());
    }

    match arena[node].num_children() {
        0 => {
            error_log!(node = %node, "node has neither value nor children");
            Err(DeleteError::WrongChildrenCount {
                node,
                num_children: 0,
                key: KeyPrefix::from(key),
            })
        },
        1 => merge_with_only_child(arena, node, key),
        _ => Ok(()),
    }
}

/// Merge `node` with its only child.
///
/// The node keeps its own id and its position under its parent, while the
/// edge label leading to it grows by the child's label. The node takes over the
/// child's value and children, then the child is freed.
fn merge_with_only_child<V>(
    arena: &mut NodeArena<V>,
    node: NodeId,
    key: &[u8],
) -> Result<(), DeleteError> {
    let Some(parent) = arena[node].parent else {
        error_log!(node = %node, "cannot merge node without parent");
        return Err(DeleteError::MissingParent {
            node,
            key: KeyPrefix::from(key),
        });
    };
    let Some(key_on_parent) = arena[node].key_on_parent.clone() else {
        error_log!(node = %node, "cannot merge node without key on parent");
        return Err(DeleteError::MissingKeyOnParent {
            node,
            key: KeyPrefix::from(key),
        });
    };
    let Some(position) = arena[parent]
        .children
        .iter()
        .position(|(label, child)| *child == node && *label == key_on_parent)
    else {
        error_log!(node = %node, parent = %parent, "key on parent not mapped to node");
        return Err(DeleteError::KeyOnParentNotMapped {
            node,
            parent,
            key: KeyPrefix::from(key),
        });
    };

    if arena[node].children.len() != 1 {
        return Err(DeleteError::WrongChildrenCount {
            node,
            num_children: arena[node].children.len(),
            key: KeyPrefix::from(key),
        });
    }
    let (child_label, child) = arena[node].children.remove(0);
    let Some(merged) = arena.free(child) else {
        error_log!(node = %node, child = %child, "only child is not allocated");
        return Err(DeleteError::WrongChildrenCount {
            node,
            num_children: 0,
            key: KeyPrefix::from(key),
        });
    };

    let mut new_label = Vec::with_capacity(key_on_parent.len() + child_label.len());
    new_label.extend_from_slice(&key_on_parent);
    new_label.extend_from_slice(&child_label);
    let new_label: Box<[u8]> = new_label.into_boxed_slice();

    for (_, grandchild) in merged.children.iter() {
        arena[*grandchild].parent = Some(node);
    }

    arena[parent].children[position].0 = new_label.clone();
    let node_ref = &mut arena[node];
    node_ref.key_on_parent = Some(new_label);
    node_ref.value = merged.value;
    node_ref.children = merged.children;

    trace_log!(
        node = %node,
        parent = %parent,
        absorbed = %child,
        label = ?node_ref.key_on_parent.as_deref().map(KeyPrefix::from),
        "merged node with only child"
    );

    Ok(())
}
