//! Trie node lookup and manipulation
//!
//! Every operation walks down from the root, consuming the unmatched part of
//! the key against the edge labels. Because no two sibling labels share a
//! first byte, each step has at most one candidate child.

mod insert;
pub use insert::*;

mod lookup;
pub use lookup::*;

mod delete;
pub use delete::*;

/// Return the number of leading bytes shared by both slices.
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(a, b)| a == b).count()
}

#[cfg(test)]
mod tests {
    use super::common_prefix_len;

    #[test]
    fn common_prefix_len_stops_at_first_difference() {
        assert_eq!(common_prefix_len(b"AA-AA", b"AA-AB"), 4);
        assert_eq!(common_prefix_len(b"AA", b"AA-AA"), 2);
        assert_eq!(common_prefix_len(b"AA-AA", b"AA"), 2);
        assert_eq!(common_prefix_len(b"BB", b"AA"), 0);
        assert_eq!(common_prefix_len(b"", b"AA"), 0);
    }
}
