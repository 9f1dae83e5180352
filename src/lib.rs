#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    missing_docs,
    clippy::missing_safety_doc,
    unsafe_code,
    deprecated_in_future,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rustdoc::invalid_codeblock_attributes
)]
#![doc(
    html_playground_url = "https://play.rust-lang.org/",
    test(attr(deny(warnings)))
)]

//! Compressed trie (radix tree) implementation
//!
//! The [`RadixTrie`] maps byte-string keys to values. Edges carry whole byte
//! sequences, and chains of single-child nodes are collapsed on every insert
//! and delete, so the tree is always maximally compressed.
//!
//! Supported operations are insert, exact and prefix search, exact and prefix
//! delete, and a running insert count. The finished structure can be walked
//! read-only through [`RadixTrie::root`] or with a [`visitor::Visitor`].
//!
//! Nodes are stored in a [`NodeArena`] and addressed by [`NodeId`]. Children
//! are owned by the edges of their parent, while the parent link on each node
//! is a plain id used to re-link the tree when a delete merges nodes.
//!
//! # References
//!
//!  - Morrison, D. R. (1968). PATRICIA - Practical Algorithm To Retrieve
//!    Information Coded in Alphanumeric. Journal of the ACM, 15(4), 514-534.

extern crate alloc;

mod bytes;
mod collections;
mod nodes;
mod tracing_helpers;

#[doc(hidden)]
pub mod tests_common;

pub use bytes::*;
pub use collections::*;
pub use nodes::{visitor, *};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
