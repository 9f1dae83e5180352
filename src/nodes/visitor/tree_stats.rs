use crate::{
    visitor::{Visitable, Visitor},
    NodeRef, RadixTrie,
};
use alloc::collections::BTreeMap;
use core::fmt;

/// A visitor of the radix tree which collects statistics about the tree, like
/// how many inner nodes and leaves there are and how the edges are spread.
#[derive(Debug)]
pub struct TreeStatsCollector {
    stats: TreeStats,
    depth: usize,
    key_len: usize,
}

impl TreeStatsCollector {
    /// Run the tree stats collection on the given trie, then return the
    /// accumulated stats.
    pub fn collect<V>(trie: &RadixTrie<V>) -> TreeStats {
        let mut collector = TreeStatsCollector {
            stats: TreeStats::default(),
            depth: 0,
            key_len: 0,
        };

        trie.root().visit_with(&mut collector);

        collector.stats
    }

    /// Iterate through the given trie and return the number of leaf nodes.
    pub fn count_leaf_nodes<V>(trie: &RadixTrie<V>) -> usize {
        struct LeafNodeCounter;

        impl<V> Visitor<V> for LeafNodeCounter {
            type Output = usize;

            fn default_output(&self) -> Self::Output {
                0
            }

            fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output {
                o1 + o2
            }

            fn visit_leaf(&mut self, t: NodeRef<'_, V>) -> Self::Output {
                usize::from(!t.is_root())
            }
        }

        trie.root().visit_with(&mut LeafNodeCounter)
    }

    fn descend<V>(&mut self, t: NodeRef<'_, V>) {
        if let Some(label) = t.key_on_parent() {
            self.depth += 1;
            self.key_len += label.len();
        }
    }

    fn ascend<V>(&mut self, t: NodeRef<'_, V>) {
        if let Some(label) = t.key_on_parent() {
            self.depth -= 1;
            self.key_len -= label.len();
        }
    }

    fn record_value<V>(&mut self, t: NodeRef<'_, V>) {
        if t.value().is_some() {
            self.stats.num_values += 1;
            self.stats.total_key_bytes += self.key_len;
        }
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
    }
}

/// Collection of stats about the shape of a trie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of inner nodes by their number of children, root included.
    fan_out: BTreeMap<usize, u64>,
    leaf_count: u64,
    valued_inner_count: u64,
    num_values: u64,
    max_depth: usize,
    total_label_bytes: usize,
    total_key_bytes: usize,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStats")
            .field("inner_count", &self.inner_count())
            .field("fan_out", &self.fan_out)
            .field("valued_inner_count", &self.valued_inner_count)
            .field("leaf_count", &self.leaf_count)
            .field("max_depth", &self.max_depth)
            .field("total_label_bytes", &self.total_label_bytes)
            .field("total_key_bytes", &self.total_key_bytes)
            .field("compression_ratio", &self.compression_ratio())
            .finish()
    }
}

impl TreeStats {
    /// Number of nodes with at least one child, including the root if the
    /// trie is not empty.
    pub fn inner_count(&self) -> u64 {
        self.fan_out.values().sum()
    }

    /// Number of inner nodes with exactly `num_children` children.
    pub fn inner_count_with_children(&self, num_children: usize) -> u64 {
        self.fan_out.get(&num_children).copied().unwrap_or(0)
    }

    /// Number of inner nodes that also hold a value, because a stored key
    /// ends there.
    pub fn valued_inner_count(&self) -> u64 {
        self.valued_inner_count
    }

    /// Number of nodes without children, not counting an empty root.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Number of values stored in the trie.
    pub fn num_values(&self) -> u64 {
        self.num_values
    }

    /// The largest number of edges between the root and any node.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The total number of bytes of edge labels in the trie.
    pub fn total_label_bytes(&self) -> usize {
        self.total_label_bytes
    }

    /// The total number of bytes of the keys stored in the trie.
    pub fn total_key_bytes(&self) -> usize {
        self.total_key_bytes
    }

    /// Returns the ratio of label bytes stored to key bytes represented.
    ///
    /// A value below 1.0 means shared prefixes are stored only once. Returns
    /// 0.0 for an empty trie.
    pub fn compression_ratio(&self) -> f64 {
        if self.total_key_bytes == 0 {
            0.0
        } else {
            (self.total_label_bytes as f64) / (self.total_key_bytes as f64)
        }
    }
}

impl<V> Visitor<V> for TreeStatsCollector {
    type Output = ();

    fn default_output(&self) -> Self::Output {}

    fn combine_output(&self, _: Self::Output, _: Self::Output) -> Self::Output {}

    fn enter_inner(&mut self, t: NodeRef<'_, V>) -> Self::Output {
        self.descend(t);
        self.record_value(t);
        *self.stats.fan_out.entry(t.num_children()).or_insert(0) += 1;
        if t.value().is_some() {
            self.stats.valued_inner_count += 1;
        }
        self.stats.total_label_bytes += t
            .children()
            .map(|(label, _)| label.len())
            .sum::<usize>();
    }

    fn visit_inner(&mut self, t: NodeRef<'_, V>, _: Self::Output) -> Self::Output {
        self.ascend(t);
    }

    fn visit_leaf(&mut self, t: NodeRef<'_, V>) -> Self::Output {
        if !t.is_root() {
            self.stats.leaf_count += 1;
        }
        self.descend(t);
        self.record_value(t);
        self.ascend(t);
    }
}
