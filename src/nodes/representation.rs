//! Node and arena types for the radix trie.
//!
//! Every node lives in a single [`NodeArena`] and is addressed by a
//! [`NodeId`]. Edges from a node to its children are owned by the parent and
//! store the child id next to the edge label. The parent link and the
//! `key_on_parent` label on each child are bookkeeping only, they never own
//! anything and are only used to re-link the tree during delete.

use alloc::{boxed::Box, vec::Vec};
use core::{
    fmt,
    iter::FusedIterator,
    ops::{Index, IndexMut},
};

/// Index of a node inside of a [`NodeArena`].
///
/// Ids are recycled after a node is freed, so an id is only meaningful while
/// the node it was handed out for is still part of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The id of the root node, which is allocated when the arena is created
    /// and never freed.
    pub const ROOT: NodeId = NodeId(0);

    /// Return the slot index of this node in the arena.
    pub fn index(self) -> usize {
        self.0
    }

    /// Return true if this is the id of the root node.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A sequence of key bytes identifying a location in the tree, usually the
/// concatenation of edge labels from the root.
///
/// The debug output renders printable ASCII as-is and escapes everything else,
/// so that textual keys stay readable in error messages.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct KeyPrefix(Box<[u8]>);

impl KeyPrefix {
    /// View the prefix as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for KeyPrefix {
    fn from(src: &[u8]) -> Self {
        KeyPrefix(Box::from(src))
    }
}

impl<const LEN: usize> PartialEq<[u8; LEN]> for KeyPrefix {
    fn eq(&self, other: &[u8; LEN]) -> bool {
        self.0.as_ref() == other.as_slice()
    }
}

impl fmt::Debug for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for byte in self.0.iter() {
            write!(f, "{}", core::ascii::escape_default(*byte))?;
        }
        write!(f, "\"")
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single vertex of the radix trie.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// Labelled edges to the children of this node, in the order they were
    /// created. No two labels start with the same byte.
    pub(crate) children: Vec<(Box<[u8]>, NodeId)>,
    /// The node that owns the edge leading here, `None` for the root.
    pub(crate) parent: Option<NodeId>,
    /// The label of the edge leading here, `None` for the root.
    pub(crate) key_on_parent: Option<Box<[u8]>>,
    /// The value stored for the key ending at this node.
    pub(crate) value: Option<V>,
}

impl<V> Node<V> {
    /// Create an empty node with no parent.
    pub(crate) fn new_root() -> Self {
        Node {
            children: Vec::new(),
            parent: None,
            key_on_parent: None,
            value: None,
        }
    }

    /// Create a node that will be attached under `parent` with the given edge
    /// label.
    pub(crate) fn new_child(parent: NodeId, label: &[u8], value: Option<V>) -> Self {
        debug_assert!(!label.is_empty(), "edge labels must not be empty");
        Node {
            children: Vec::new(),
            parent: Some(parent),
            key_on_parent: Some(Box::from(label)),
            value,
        }
    }

    /// Return true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Return the value stored at this node, if any.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Return the edge label leading to this node.
    pub fn key_on_parent(&self) -> Option<&[u8]> {
        self.key_on_parent.as_deref()
    }

    /// Return the parent of this node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Iterate over the edges of this node, in stored order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (&[u8], NodeId)> + '_ {
        self.children.iter().map(|(label, id)| (label.as_ref(), *id))
    }

    /// Return the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Find the single edge whose label starts with the given byte.
    ///
    /// Returns the position of the edge in the child list, the label and the
    /// child id.
    pub(crate) fn find_child(&self, first_byte: u8) -> Option<(usize, &[u8], NodeId)> {
        self.children
            .iter()
            .enumerate()
            .find(|(_, (label, _))| label.first() == Some(&first_byte))
            .map(|(idx, (label, id))| (idx, label.as_ref(), *id))
    }

    /// Find the position of the edge that points at `child`.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|(_, id)| *id == child)
    }
}

/// Backing storage for every node of a trie.
///
/// Freed slots are kept on a free list and handed out again by later
/// allocations. The root occupies slot 0 for the whole lifetime of the arena.
#[derive(Debug, Clone)]
pub struct NodeArena<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<NodeId>,
}

impl<V> Default for NodeArena<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NodeArena<V> {
    /// Create an arena that only contains an empty root.
    pub fn new() -> Self {
        NodeArena {
            slots: alloc::vec![Some(Node::new_root())],
            free: Vec::new(),
        }
    }

    /// Store a node in the arena and return its id.
    pub(crate) fn allocate(&mut self, node: Node<V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none(), "free list slot [{id}] is occupied");
                self.slots[id.0] = Some(node);
                id
            },
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Some(node));
                id
            },
        }
    }

    /// Remove a single node from the arena, returning it.
    ///
    /// The children of the node are not touched. Returns `None` if the slot
    /// was already empty or the id is the root.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<V>> {
        if id.is_root() {
            return None;
        }
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(node)
    }

    /// Remove the given node and every node below it, returning the number of
    /// values that were dropped.
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = Vec::new();
        let mut num_values = 0;

        stack.push(id);

        while let Some(next) = stack.pop() {
            if let Some(node) = self.free(next) {
                stack.extend(node.children.iter().map(|(_, child)| *child));
                if node.value.is_some() {
                    num_values += 1;
                }
            }
        }

        num_values
    }

    /// Drop every node except an empty root.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.slots.push(Some(Node::new_root()));
    }

    /// Return the node stored under the given id.
    pub fn get(&self, id: NodeId) -> Option<&Node<V>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Return the node stored under the given id, mutably.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Return the number of nodes currently stored, root included.
    pub fn live_nodes(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Return a read-only handle to the root node.
    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef {
            arena: self,
            id: NodeId::ROOT,
        }
    }
}

impl<V> Index<NodeId> for NodeArena<V> {
    type Output = Node<V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node [{id}] is not allocated in this arena"),
        }
    }
}

impl<V> IndexMut<NodeId> for NodeArena<V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node [{id}] is not allocated in this arena"),
        }
    }
}

/// Read-only handle to a node of a trie.
///
/// This is the entry point for code that needs to walk the finished structure,
/// for example to serialize it: every handle can report whether it is a leaf,
/// its value, and its children keyed by edge label.
pub struct NodeRef<'a, V> {
    arena: &'a NodeArena<V>,
    id: NodeId,
}

impl<'a, V> Clone for NodeRef<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for NodeRef<'a, V> {}

impl<'a, V: fmt::Debug> fmt::Debug for NodeRef<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key_on_parent", &self.key_on_parent().map(KeyPrefix::from))
            .field("value", &self.value())
            .field("num_children", &self.num_children())
            .finish()
    }
}

impl<'a, V> NodeRef<'a, V> {
    fn node(&self) -> &'a Node<V> {
        &self.arena[self.id]
    }

    /// Return the arena id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Return true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Return true if this is the root of the trie.
    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Return the value stored at this node, if any.
    ///
    /// Leaves always carry a value. Inner nodes only carry one when a stored
    /// key ends exactly at this node.
    pub fn value(&self) -> Option<&'a V> {
        self.node().value.as_ref()
    }

    /// Return the label of the edge leading to this node.
    pub fn key_on_parent(&self) -> Option<&'a [u8]> {
        self.node().key_on_parent.as_deref()
    }

    /// Return a handle to the parent of this node.
    pub fn parent(&self) -> Option<NodeRef<'a, V>> {
        self.node().parent.map(|id| NodeRef {
            arena: self.arena,
            id,
        })
    }

    /// Return the number of children.
    pub fn num_children(&self) -> usize {
        self.node().children.len()
    }

    /// Iterate over the children of this node together with their edge
    /// labels.
    pub fn children(&self) -> Children<'a, V> {
        Children {
            arena: self.arena,
            inner: self.node().children.iter(),
        }
    }

    /// Return the child reached through the edge with exactly this label.
    pub fn child(&self, label: &[u8]) -> Option<NodeRef<'a, V>> {
        self.children()
            .find(|(child_label, _)| *child_label == label)
            .map(|(_, child)| child)
    }
}

/// Iterator over the labelled children of a node. See [`NodeRef::children`].
pub struct Children<'a, V> {
    arena: &'a NodeArena<V>,
    inner: core::slice::Iter<'a, (Box<[u8]>, NodeId)>,
}

impl<'a, V> Iterator for Children<'a, V> {
    type Item = (&'a [u8], NodeRef<'a, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let (label, id) = self.inner.next()?;
        Some((
            label.as_ref(),
            NodeRef {
                arena: self.arena,
                id: *id,
            },
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, V> DoubleEndedIterator for Children<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (label, id) = self.inner.next_back()?;
        Some((
            label.as_ref(),
            NodeRef {
                arena: self.arena,
                id: *id,
            },
        ))
    }
}

impl<'a, V> ExactSizeIterator for Children<'a, V> {}

impl<'a, V> FusedIterator for Children<'a, V> {}
