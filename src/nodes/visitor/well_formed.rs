use crate::{KeyPrefix, NodeArena, NodeId, NodeRef, RadixTrie};
use alloc::{collections::BTreeMap, vec::Vec};
use core::{error::Error, fmt};

/// An issue with the well-formed-ness of the tree. See the documentation on
/// [`WellFormedChecker`] for more context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// A loop was observed between nodes
    LoopFound {
        /// The node that was observed more than once while traversing the tree
        node: NodeId,
        /// The key prefix when the node was first observed
        first_observed: KeyPrefix,
        /// The key prefix when the node was observed a second time
        later_observed: KeyPrefix,
    },
    /// An edge had an empty label
    EmptyLabel {
        /// The key prefix of the node owning the edge
        key_prefix: KeyPrefix,
    },
    /// Two edges of the same node started with the same byte
    SharedFirstByte {
        /// The key prefix of the node owning the edges
        key_prefix: KeyPrefix,
        /// The first byte shared by the labels
        first_byte: u8,
    },
    /// The parent link of a child did not point back at the node owning the
    /// edge to it
    ParentMismatch {
        /// The key prefix of the child
        key_prefix: KeyPrefix,
        /// The node owning the edge
        expected: NodeId,
        /// The parent recorded on the child
        found: Option<NodeId>,
    },
    /// The label recorded on a child did not match the edge label leading to it
    KeyOnParentMismatch {
        /// The key prefix of the child
        key_prefix: KeyPrefix,
        /// The label of the edge
        edge_label: KeyPrefix,
        /// The label recorded on the child
        found: Option<KeyPrefix>,
    },
    /// A non-root node without children had no value
    LeafWithoutValue {
        /// The key prefix of the leaf
        key_prefix: KeyPrefix,
    },
    /// A non-root node without a value had fewer than two children, so it
    /// should have been merged with its child
    UncompressedNode {
        /// The key prefix of the node
        key_prefix: KeyPrefix,
        /// The number of children found at the node
        num_children: usize,
    },
    /// The root node had a value, a parent, or an edge label
    MalformedRoot,
    /// The number of nodes reachable from the root differs from the number of
    /// nodes allocated in the arena
    UnreachableNodes {
        /// The number of nodes reachable from the root
        reachable: usize,
        /// The number of nodes allocated in the arena
        allocated: usize,
    },
    /// The number of values in the tree differs from the tracked entry count
    WrongEntryCount {
        /// The number of values found in the tree
        found: usize,
        /// The entry count tracked by the trie
        expected: usize,
    },
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::LoopFound {
                node,
                first_observed,
                later_observed,
            } => write!(
                f,
                "Found a loop in the tree containing the node [{node}]. First observed that node \
                 at [{first_observed:?}], then later observed the same node at \
                 [{later_observed:?}]",
            ),
            MalformedTreeError::EmptyLabel { key_prefix } => {
                write!(f, "Found an empty edge label under [{key_prefix:?}]")
            },
            MalformedTreeError::SharedFirstByte {
                key_prefix,
                first_byte,
            } => write!(
                f,
                "Found two edges under [{key_prefix:?}] starting with the same byte \
                 [{first_byte:#04x}]"
            ),
            MalformedTreeError::ParentMismatch {
                key_prefix,
                expected,
                found,
            } => write!(
                f,
                "Node at [{key_prefix:?}] should have parent [{expected}], but has [{found:?}]"
            ),
            MalformedTreeError::KeyOnParentMismatch {
                key_prefix,
                edge_label,
                found,
            } => write!(
                f,
                "Node at [{key_prefix:?}] is reached through [{edge_label:?}], but records the \
                 label [{found:?}]"
            ),
            MalformedTreeError::LeafWithoutValue { key_prefix } => {
                write!(f, "Found a leaf without a value at [{key_prefix:?}]")
            },
            MalformedTreeError::UncompressedNode {
                key_prefix,
                num_children,
            } => write!(
                f,
                "Found a node without a value at [{key_prefix:?}] that had [{num_children}] \
                 children, expected at least 2"
            ),
            MalformedTreeError::MalformedRoot => {
                write!(f, "The root node has a value, a parent, or an edge label")
            },
            MalformedTreeError::UnreachableNodes {
                reachable,
                allocated,
            } => write!(
                f,
                "Only [{reachable}] of the [{allocated}] allocated nodes are reachable from the \
                 root"
            ),
            MalformedTreeError::WrongEntryCount { found, expected } => write!(
                f,
                "Found [{found}] values in the tree, but the trie tracks [{expected}] entries"
            ),
        }
    }
}

impl Error for MalformedTreeError {}

/// A walk over the radix tree which checks that the tree is well-formed.
///
/// In this context, well-formed means that in the tree:
///  1. there are no loops between nodes and every allocated node is reachable
///  2. edge labels are non-empty and no two sibling labels share a first byte
///  3. every child points back at its parent, recording the edge label that
///     leads to it
///  4. every leaf holds a value, and every node without a value (other than
///     the root) has at least two children
///  5. the root holds no value
///
/// #2 and #4 are a possibility if specific tree operations are not implemented
/// correctly. This checker can be used to sanity check the tree in unit tests
/// or other test cases.
///
/// This checker will only return a single issue at a time. A tree is only
/// "well-formed" (by the definition given above) if the checker returns
/// `Ok(_)`.
#[derive(Debug)]
pub struct WellFormedChecker {
    current_key_prefix: Vec<u8>,
    seen_nodes: BTreeMap<NodeId, KeyPrefix>,
    num_values: usize,
}

impl WellFormedChecker {
    /// Traverse the given trie and check that it is well-formed. Returns the
    /// number of nodes in the tree, including the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the given tree is not well-formed, or the number of
    /// values does not match [`RadixTrie::len`].
    pub fn check<V>(trie: &RadixTrie<V>) -> Result<usize, MalformedTreeError> {
        let (num_nodes, num_values) = Self::check_tree(trie.arena())?;

        if num_values != trie.len() {
            return Err(MalformedTreeError::WrongEntryCount {
                found: num_values,
                expected: trie.len(),
            });
        }

        Ok(num_nodes)
    }

    /// Traverse the tree stored in the arena and check that it is well-formed.
    /// Returns the number of nodes and the number of values in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the given tree is not well-formed.
    pub fn check_tree<V>(arena: &NodeArena<V>) -> Result<(usize, usize), MalformedTreeError> {
        let root = arena.root();
        if root.value().is_some() || root.parent().is_some() || root.key_on_parent().is_some() {
            return Err(MalformedTreeError::MalformedRoot);
        }

        let mut checker = WellFormedChecker {
            current_key_prefix: Vec::new(),
            seen_nodes: BTreeMap::new(),
            num_values: 0,
        };

        // We see the root node at the empty prefix
        checker.seen_nodes.insert(root.id(), KeyPrefix::default());

        // Pending nodes, with the length of their parent key prefix
        let mut pending = Vec::new();
        pending.push((root, 0));
        let mut num_nodes = 0;

        while let Some((node, parent_key_len)) = pending.pop() {
            checker.current_key_prefix.truncate(parent_key_len);
            if let Some(label) = node.key_on_parent() {
                checker.current_key_prefix.extend_from_slice(label);
            }

            checker.check_node(node, &mut pending)?;
            num_nodes += 1;
        }

        if num_nodes != arena.live_nodes() {
            return Err(MalformedTreeError::UnreachableNodes {
                reachable: num_nodes,
                allocated: arena.live_nodes(),
            });
        }

        Ok((num_nodes, checker.num_values))
    }

    fn key_prefix(&self) -> KeyPrefix {
        self.current_key_prefix.as_slice().into()
    }

    /// Check a single node and the edges to its children, then queue the
    /// children so that they are checked in stored order.
    fn check_node<'a, V>(
        &mut self,
        node: NodeRef<'a, V>,
        pending: &mut Vec<(NodeRef<'a, V>, usize)>,
    ) -> Result<(), MalformedTreeError> {
        if node.value().is_some() {
            self.num_values += 1;
        } else if !node.is_root() {
            if node.is_leaf() {
                return Err(MalformedTreeError::LeafWithoutValue {
                    key_prefix: self.key_prefix(),
                });
            }
            if node.num_children() < 2 {
                return Err(MalformedTreeError::UncompressedNode {
                    key_prefix: self.key_prefix(),
                    num_children: node.num_children(),
                });
            }
        }

        let key_prefix_len = self.current_key_prefix.len();
        let first_pending = pending.len();
        let mut first_bytes = [false; 256];
        for (label, child) in node.children() {
            let Some(first_byte) = label.first() else {
                return Err(MalformedTreeError::EmptyLabel {
                    key_prefix: self.key_prefix(),
                });
            };
            if first_bytes[usize::from(*first_byte)] {
                return Err(MalformedTreeError::SharedFirstByte {
                    key_prefix: self.key_prefix(),
                    first_byte: *first_byte,
                });
            }
            first_bytes[usize::from(*first_byte)] = true;

            // key prefix of the child, restored below
            self.current_key_prefix.extend_from_slice(label);

            let child_key_prefix = self.key_prefix();
            if let Some(first_observed) = self.seen_nodes.get(&child.id()) {
                return Err(MalformedTreeError::LoopFound {
                    node: child.id(),
                    first_observed: first_observed.clone(),
                    later_observed: child_key_prefix,
                });
            }
            self.seen_nodes.insert(child.id(), child_key_prefix);

            let parent = child.parent().map(|parent| parent.id());
            if parent != Some(node.id()) {
                return Err(MalformedTreeError::ParentMismatch {
                    key_prefix: self.key_prefix(),
                    expected: node.id(),
                    found: parent,
                });
            }
            if child.key_on_parent() != Some(label) {
                return Err(MalformedTreeError::KeyOnParentMismatch {
                    key_prefix: self.key_prefix(),
                    edge_label: KeyPrefix::from(label),
                    found: child.key_on_parent().map(KeyPrefix::from),
                });
            }

            self.current_key_prefix.truncate(key_prefix_len);
            pending.push((child, key_prefix_len));
        }

        // the stack pops from the back
        pending[first_pending..].reverse();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests_common::{generate_key_fixed_length, generate_key_with_prefixes},
        Node,
    };
    use alloc::boxed::Box;

    #[test]
    fn check_well_formed_tree() {
        let mut trie = RadixTrie::new();
        for (idx, key) in generate_key_fixed_length(3, 2).enumerate() {
            trie.insert(&key, idx).unwrap();
        }
        // 3 * 3 * 3
        assert_eq!(trie.len(), 27);
        // root + 3 + 9 inner nodes, 27 leaves
        assert_eq!(WellFormedChecker::check(&trie), Ok(40));
    }

    #[test]
    fn check_empty_tree() {
        let trie = RadixTrie::<u8>::new();
        assert_eq!(WellFormedChecker::check(&trie), Ok(1));
    }

    #[test]
    fn check_tree_with_uncompressed_node() {
        let mut arena = NodeArena::new();
        let inner = arena.allocate(Node::new_child(NodeId::ROOT, b"AA-A", None));
        let leaf = arena.allocate(Node::new_child(inner, b"A", Some(1)));
        arena[inner].children.push((Box::from(&b"A"[..]), leaf));
        arena[NodeId::ROOT]
            .children
            .push((Box::from(&b"AA-A"[..]), inner));

        assert_eq!(
            WellFormedChecker::check_tree(&arena),
            Err(MalformedTreeError::UncompressedNode {
                key_prefix: KeyPrefix::from(&b"AA-A"[..]),
                num_children: 1,
            })
        );
    }

    #[test]
    fn check_tree_with_shared_first_byte() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(Node::new_child(NodeId::ROOT, b"AA", Some(1)));
        let b = arena.allocate(Node::new_child(NodeId::ROOT, b"AB", Some(2)));
        arena[NodeId::ROOT].children.push((Box::from(&b"AA"[..]), a));
        arena[NodeId::ROOT].children.push((Box::from(&b"AB"[..]), b));

        assert_eq!(
            WellFormedChecker::check_tree(&arena),
            Err(MalformedTreeError::SharedFirstByte {
                key_prefix: KeyPrefix::default(),
                first_byte: b'A',
            })
        );
    }

    #[test]
    fn check_tree_with_wrong_parent_link() {
        let mut arena = NodeArena::new();
        let a = arena.allocate(Node::new_child(NodeId::ROOT, b"AA", Some(1)));
        let b = arena.allocate(Node::new_child(a, b"BB", Some(2)));
        arena[NodeId::ROOT].children.push((Box::from(&b"AA"[..]), a));
        arena[NodeId::ROOT].children.push((Box::from(&b"BB"[..]), b));

        assert_eq!(
            WellFormedChecker::check_tree(&arena),
            Err(MalformedTreeError::ParentMismatch {
                key_prefix: KeyPrefix::from(&b"BB"[..]),
                expected: NodeId::ROOT,
                found: Some(a),
            })
        );
    }

    #[test]
    fn check_tree_with_loop() {
        let mut arena = NodeArena::new();
        let inner = arena.allocate(Node::new_child(NodeId::ROOT, b"A", None));
        let leaf = arena.allocate(Node::new_child(inner, b"B", Some(1)));
        arena[inner].children.push((Box::from(&b"B"[..]), leaf));
        arena[NodeId::ROOT].children.push((Box::from(&b"A"[..]), inner));
        // second edge back to the inner node from itself
        arena[inner].children.push((Box::from(&b"A"[..]), inner));
        arena[inner].key_on_parent = Some(Box::from(&b"A"[..]));

        let err = WellFormedChecker::check_tree(&arena).expect_err("should have found a loop");
        match err {
            MalformedTreeError::LoopFound {
                node,
                first_observed,
                later_observed,
            } => {
                assert_eq!(node, inner);
                assert_eq!(first_observed, *b"A");
                assert_eq!(later_observed, *b"AA");
            },
            other => panic!("unexpected error [{other}]"),
        }
    }

    #[test]
    fn check_tree_with_unreachable_node() {
        let mut arena = NodeArena::new();
        let _orphan = arena.allocate(Node::new_child(NodeId::ROOT, b"A", Some(1)));

        assert_eq!(
            WellFormedChecker::check_tree(&arena),
            Err(MalformedTreeError::UnreachableNodes {
                reachable: 1,
                allocated: 2,
            })
        );
    }

    #[test]
    fn check_deep_tree() {
        #[cfg(not(miri))]
        const DEPTH: usize = 8_000;

        #[cfg(miri)]
        const DEPTH: usize = 64;

        let mut trie = RadixTrie::new();
        for key in generate_key_with_prefixes(DEPTH) {
            trie.insert(&key, key.len()).unwrap();
        }

        // root plus one node per key
        assert_eq!(WellFormedChecker::check(&trie), Ok(DEPTH + 1));

        trie.delete(&[1u8], false).unwrap();
        assert_eq!(WellFormedChecker::check(&trie), Ok(1));
    }

    #[test]
    fn check_deep_tree_with_broken_link() {
        let mut arena = setup_deep_arena(5_000);
        let mut current = NodeId::ROOT;
        while let Some((_, child)) = arena[current].edges().next() {
            current = child;
        }
        arena[current].key_on_parent = Some(Box::from(&b"?"[..]));

        match WellFormedChecker::check_tree(&arena) {
            Err(MalformedTreeError::KeyOnParentMismatch { key_prefix, .. }) => {
                assert_eq!(key_prefix.as_bytes().len(), 5_000);
            },
            other => panic!("unexpected result [{other:?}]"),
        }
    }

    fn setup_deep_arena(depth: usize) -> NodeArena<usize> {
        crate::tests_common::setup_arena_from_entries(
            generate_key_with_prefixes(depth).map(|key| {
                let len = key.len();
                (key, len)
            }),
        )
    }
}
