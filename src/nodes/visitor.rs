//! Utilities for inspecting the trie structure.
//!
//! Code that needs to walk the whole tree, for example to serialize it as
//! static data, can either use [`NodeRef`] directly or implement [`Visitor`]
//! and let the traversal drive it.

#[cfg(feature = "std")]
mod pretty_printer;
mod tree_stats;
mod well_formed;

#[cfg(feature = "std")]
pub use pretty_printer::*;
pub use tree_stats::*;
pub use well_formed::*;

use crate::{Children, NodeRef};
use alloc::vec::Vec;

/// The `Visitable` trait allows [`Visitor`]s to traverse the structure of the
/// implementing type and produce some output.
pub trait Visitable<V> {
    /// This function will traverse the implementing type and execute any
    /// specific logic from the given [`Visitor`].
    ///
    /// For a [`NodeRef`] the subtree is walked in pre-order from an explicit
    /// stack, so the depth of the tree is not limited by the call stack.
    fn visit_with<O: Visitor<V>>(&self, visitor: &mut O) -> O::Output;
}

/// A node whose children are still being visited, with the output collected
/// so far.
struct Frame<'a, V, T> {
    node: NodeRef<'a, V>,
    children: Children<'a, V>,
    output: Option<T>,
}

impl<'a, V, T> Frame<'a, V, T> {
    fn enter<O: Visitor<V, Output = T>>(visitor: &mut O, node: NodeRef<'a, V>) -> Self {
        let output = visitor.enter_inner(node);
        Frame {
            node,
            children: node.children(),
            output: Some(output),
        }
    }

    fn absorb<O: Visitor<V, Output = T>>(&mut self, visitor: &O, output: T) {
        let combined = match self.output.take() {
            Some(accum) => visitor.combine_output(accum, output),
            None => output,
        };
        self.output = Some(combined);
    }
}

impl<'a, V> Visitable<V> for NodeRef<'a, V> {
    fn visit_with<O: Visitor<V>>(&self, visitor: &mut O) -> O::Output {
        if self.is_leaf() {
            return visitor.visit_leaf(*self);
        }

        let mut stack = Vec::new();
        stack.push(Frame::enter(visitor, *self));

        while let Some(frame) = stack.last_mut() {
            match frame.children.next() {
                Some((_, child)) if child.is_leaf() => {
                    let output = visitor.visit_leaf(child);
                    frame.absorb(visitor, output);
                },
                Some((_, child)) => {
                    let entered = Frame::enter(visitor, child);
                    stack.push(entered);
                },
                None => {
                    let Some(finished) = stack.pop() else {
                        break;
                    };
                    let children = finished
                        .output
                        .unwrap_or_else(|| visitor.default_output());
                    let output = visitor.visit_inner(finished.node, children);
                    match stack.last_mut() {
                        Some(parent) => parent.absorb(visitor, output),
                        None => return output,
                    }
                },
            }
        }

        visitor.default_output()
    }
}

/// The `Visitor` trait allows creating new operations on the radix tree by
/// overriding specific handling methods for inner nodes and leaves.
///
/// Every node with children is first passed to [`Visitor::enter_inner`], then
/// its children are visited in stored order, and finally
/// [`Visitor::visit_inner`] receives the combined output of the node and its
/// children.
pub trait Visitor<V>: Sized {
    /// The type of value that the visitor produces.
    type Output;

    /// Produce the default value of the [`Self::Output`] type.
    fn default_output(&self) -> Self::Output;

    /// Combine two instances of the [`Self::Output`] type for this [`Visitor`].
    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output;

    /// Visit a node with at least one child, before any of its children. The
    /// root is visited through this hook unless the tree is empty.
    fn enter_inner(&mut self, _t: NodeRef<'_, V>) -> Self::Output {
        self.default_output()
    }

    /// Finish a node with at least one child, after all of its children.
    /// `children` holds the output of [`Visitor::enter_inner`] combined with
    /// the output of every child.
    fn visit_inner(&mut self, _t: NodeRef<'_, V>, children: Self::Output) -> Self::Output {
        children
    }

    /// Visit a node without children.
    fn visit_leaf(&mut self, _t: NodeRef<'_, V>) -> Self::Output {
        self.default_output()
    }
}
