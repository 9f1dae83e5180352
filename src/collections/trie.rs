//! Module containing the implementation of [`RadixTrie`].

use crate::{
    nodes::{
        clear_children, delete_exact, delete_prefix, find_node, find_prefix_subtree, insert,
        search, DeleteError, Entries, InsertError, KeyPrefix, NodeArena, NodeId, NodeRef,
        SearchHit,
    },
    tracing_helpers::debug_log,
    AsBytes,
};
use alloc::boxed::Box;
use core::fmt;

/// A compressed trie mapping byte-string keys to values.
///
/// Edges are labelled with byte sequences instead of single bytes, and chains
/// of nodes with a single child are always collapsed, so the trie stays
/// maximally compressed after every insert and delete.
///
/// Besides the number of stored entries ([`RadixTrie::len`]), the trie keeps a
/// running tally of successful inserts ([`RadixTrie::count`]). The tally also
/// counts inserts that overwrite an existing key and is not reduced by deletes.
///
/// # Examples
///
/// ```rust
/// use compact_radix::RadixTrie;
///
/// let mut trie = RadixTrie::new();
/// trie.insert("AA-AA", 1).unwrap();
/// trie.insert("AA-AB", 2).unwrap();
/// trie.insert("BB-AA", 3).unwrap();
///
/// let hits = trie.search("AA", false);
/// let keys: Vec<_> = hits.iter().filter_map(|hit| hit.key_str()).collect();
/// assert_eq!(keys, ["AA-AA", "AA-AB"]);
///
/// trie.delete("AA-AA", true).unwrap();
/// assert!(trie.search("AA-AA", true).is_empty());
/// assert_eq!(trie.get("AA-AB"), Some(&2));
/// assert_eq!(trie.count(), 3);
/// assert_eq!(trie.len(), 2);
/// ```
#[derive(Clone)]
pub struct RadixTrie<V> {
    /// Storage for all nodes, the root is always allocated.
    arena: NodeArena<V>,
    /// The number of successful inserts since creation.
    count: usize,
    /// The number of entries present in the trie.
    num_entries: usize,
}

impl<V> RadixTrie<V> {
    /// Create a new, empty [`RadixTrie`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let trie = RadixTrie::<()>::new();
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.count(), 0);
    /// ```
    pub fn new() -> Self {
        RadixTrie {
            arena: NodeArena::new(),
            count: 0,
            num_entries: 0,
        }
    }

    /// Create a trie from the given key-value pairs, inserting them in
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::EmptyKey`] on the first empty key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::{InsertError, RadixTrie};
    ///
    /// let trie = RadixTrie::try_from_iter([("a", 1), ("ab", 2)]).unwrap();
    /// assert_eq!(trie.len(), 2);
    ///
    /// let err = RadixTrie::try_from_iter([("a", 1), ("", 2)]).unwrap_err();
    /// assert_eq!(err, InsertError::EmptyKey);
    /// ```
    pub fn try_from_iter<K, I>(iter: I) -> Result<Self, InsertError>
    where
        K: AsBytes,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut trie = RadixTrie::new();
        trie.try_extend(iter)?;
        Ok(trie)
    }

    /// Insert every key-value pair from the iterator, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::EmptyKey`] on the first empty key. Pairs before
    /// it stay inserted.
    pub fn try_extend<K, I>(&mut self, iter: I) -> Result<(), InsertError>
    where
        K: AsBytes,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(&key, value)?;
        }
        Ok(())
    }

    /// Insert a key-value pair into the trie.
    ///
    /// If the key was already present, the value is replaced and the old value
    /// is returned. The insert tally returned by [`RadixTrie::count`] grows by
    /// one either way.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::EmptyKey`] if the key has no bytes, the trie is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let mut trie = RadixTrie::new();
    /// assert_eq!(trie.insert("AA", 'a').unwrap(), None);
    /// assert_eq!(trie.insert("AA", 'b').unwrap(), Some('a'));
    /// assert_eq!(trie.count(), 2);
    /// assert_eq!(trie.len(), 1);
    /// assert!(trie.insert("", 'c').is_err());
    /// ```
    pub fn insert<K>(&mut self, key: &K, value: V) -> Result<Option<V>, InsertError>
    where
        K: AsBytes + ?Sized,
    {
        let result = insert(&mut self.arena, key.as_bytes(), value)?;
        self.count += 1;
        if result.existing_value.is_none() {
            self.num_entries += 1;
        }

        Ok(result.existing_value)
    }

    /// Search the trie for the given key.
    ///
    /// With `match_exact` set, the result holds at most the single entry whose
    /// key equals `key`. Otherwise the result holds every entry whose key
    /// starts with `key`, including an exact match, in pre-order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let mut trie = RadixTrie::new();
    /// trie.insert("AA", 1).unwrap();
    /// trie.insert("AA-AA", 2).unwrap();
    ///
    /// assert_eq!(trie.search("AA-", true).len(), 0);
    /// assert_eq!(trie.search("AA-", false).len(), 1);
    /// assert_eq!(trie.search("A", false).len(), 2);
    /// ```
    pub fn search<K>(&self, key: &K, match_exact: bool) -> alloc::vec::Vec<SearchHit<'_, V>>
    where
        K: AsBytes + ?Sized,
    {
        search(&self.arena, key.as_bytes(), match_exact)
    }

    /// Delete entries from the trie, returning how many were removed.
    ///
    /// With `match_exact` set, only the entry whose key equals `key` is
    /// removed. Otherwise every entry whose key starts with `key` is removed,
    /// and an empty `key` removes everything. Deleting an absent key is not an
    /// error and returns `Ok(0)`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeleteError`] if the nodes around the removed entries are
    /// not linked consistently. This indicates a bug in the trie operations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let mut trie = RadixTrie::try_from_iter([("AA-AA", 1), ("AA-AB", 2), ("BB", 3)]).unwrap();
    /// assert_eq!(trie.delete("AA", true).unwrap(), 0);
    /// assert_eq!(trie.delete("AA", false).unwrap(), 2);
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn delete<K>(&mut self, key: &K, match_exact: bool) -> Result<usize, DeleteError>
    where
        K: AsBytes + ?Sized,
    {
        if match_exact {
            Ok(usize::from(self.remove(key)?.is_some()))
        } else {
            let removed = delete_prefix(&mut self.arena, key.as_bytes())?;
            self.num_entries -= removed;
            Ok(removed)
        }
    }

    /// Remove the entry whose key equals `key`, returning its value.
    ///
    /// # Errors
    ///
    /// Returns a [`DeleteError`] if the nodes around the removed entry are not
    /// linked consistently.
    pub fn remove<K>(&mut self, key: &K) -> Result<Option<V>, DeleteError>
    where
        K: AsBytes + ?Sized,
    {
        let value = delete_exact(&mut self.arena, key.as_bytes())?;
        if value.is_some() {
            self.num_entries -= 1;
        }
        Ok(value)
    }

    /// Returns the number of successful inserts since the trie was created.
    ///
    /// This includes inserts that replaced the value of an existing key, and
    /// it is not reduced by deletes or [`RadixTrie::clear`].
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of entries in the trie.
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Returns `true` if the trie contains no entries.
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Remove every entry from the trie.
    ///
    /// The insert tally is kept.
    pub fn clear(&mut self) {
        let removed = clear_children(&mut self.arena, NodeId::ROOT);
        debug_assert_eq!(removed, self.num_entries);
        debug_log!(removed, "cleared trie");
        self.arena.reset();
        self.num_entries = 0;
    }

    /// Returns a reference to the value stored under exactly this key.
    pub fn get<K>(&self, key: &K) -> Option<&V>
    where
        K: AsBytes + ?Sized,
    {
        let node = find_node(&self.arena, key.as_bytes())?;
        self.arena[node].value.as_ref()
    }

    /// Returns a mutable reference to the value stored under exactly this key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let mut trie = RadixTrie::new();
    /// trie.insert(&[1u8, 2, 3], 'a').unwrap();
    /// if let Some(value) = trie.get_mut(&[1u8, 2, 3]) {
    ///     *value = 'b';
    /// }
    /// assert_eq!(trie.get(&[1u8, 2, 3]), Some(&'b'));
    /// ```
    pub fn get_mut<K>(&mut self, key: &K) -> Option<&mut V>
    where
        K: AsBytes + ?Sized,
    {
        let node = find_node(&self.arena, key.as_bytes())?;
        self.arena.get_mut(node)?.value.as_mut()
    }

    /// Returns `true` if an entry is stored under exactly this key.
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        K: AsBytes + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Iterate over all entries in pre-order.
    pub fn iter(&self) -> Entries<'_, V> {
        Entries::new(&self.arena, NodeId::ROOT, alloc::vec::Vec::new())
    }

    /// Iterate over all entries whose key starts with `prefix`, in pre-order.
    ///
    /// This yields the same entries as a non-exact [`RadixTrie::search`],
    /// without collecting them first.
    pub fn prefix_iter<K>(&self, prefix: &K) -> Entries<'_, V>
    where
        K: AsBytes + ?Sized,
    {
        match find_prefix_subtree(&self.arena, prefix.as_bytes()) {
            Some((node, key_to_node)) => Entries::new(&self.arena, node, key_to_node),
            None => Entries::empty(&self.arena),
        }
    }

    /// Returns a read-only handle to the root node.
    ///
    /// The handle can be used to walk the whole structure, for example to
    /// serialize it as static data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_radix::RadixTrie;
    ///
    /// let trie = RadixTrie::try_from_iter([("AA-AA", 1), ("AA-AB", 2)]).unwrap();
    /// let root = trie.root();
    /// let (label, shared) = root.children().next().unwrap();
    /// assert_eq!(label, b"AA-A");
    /// assert!(!shared.is_leaf());
    /// assert_eq!(shared.child(b"B").and_then(|leaf| leaf.value()), Some(&2));
    /// ```
    pub fn root(&self) -> NodeRef<'_, V> {
        self.arena.root()
    }

    pub(crate) fn arena(&self) -> &NodeArena<V> {
        &self.arena
    }
}

impl<V> Default for RadixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for RadixTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (KeyPrefix::from(key.as_ref()), value)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a RadixTrie<V> {
    type IntoIter = Entries<'a, V>;
    type Item = (Box<[u8]>, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
