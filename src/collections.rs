//! Collection types built on the radix trie nodes.

pub mod trie;
pub use trie::*;
