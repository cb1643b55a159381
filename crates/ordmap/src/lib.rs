//! doctree-ordmap — a persistent, insertion-order-preserving map.
//!
//! [`OrdMap`] combines an [`im::Vector`] of keys (the iteration order) with
//! an [`im::HashMap`] of key→value entries.  Every operation is pure: the
//! receiver is never mutated, and the returned map shares unchanged
//! substructure with its input thanks to `im`'s structural sharing.
//!
//! The positional operations ([`take_until`](OrdMap::take_until),
//! [`skip_until`](OrdMap::skip_until), [`skip`](OrdMap::skip),
//! [`slice`](OrdMap::slice), [`concat`](OrdMap::concat)) let a caller
//! partition a map around an entry and recombine the pieces, which is how
//! consumers splice new entries into the middle of an otherwise
//! append-only ordering.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

use im::{HashMap, Vector};

// ── OrdMap ─────────────────────────────────────────────────────────────────

/// An immutable map that remembers the order in which keys were first
/// inserted.
///
/// Updating an existing key keeps its position; inserting a fresh key
/// appends it.  Iteration always follows insertion order.
pub struct OrdMap<K, V> {
    order: Vector<K>,
    entries: HashMap<K, V>,
}

impl<K, V> OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    /// An empty map.
    pub fn new() -> Self {
        Self {
            order: Vector::new(),
            entries: HashMap::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a value by key.  Absent key → `None`.
    pub fn get<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.entries.get(key)
    }

    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.entries.contains_key(key)
    }

    /// Index of a key in iteration order, if present.
    pub fn position_of<BK>(&self, key: &BK) -> Option<usize>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.order.iter().position(|k| k.borrow() == key)
    }

    /// Insert or update a single entry.
    ///
    /// A fresh key is appended to the iteration order; an existing key
    /// keeps its position and only the value changes.
    pub fn set(&self, key: K, value: V) -> Self {
        let mut order = self.order.clone();
        if !self.entries.contains_key(&key) {
            order.push_back(key.clone());
        }
        Self {
            order,
            entries: self.entries.update(key, value),
        }
    }

    /// Overlay a batch of entries, as if by repeated [`set`](OrdMap::set).
    pub fn merge<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .fold(self.clone(), |map, (k, v)| map.set(k, v))
    }

    /// Remove an entry.  Removing an absent key is a no-op.
    pub fn remove<BK>(&self, key: &BK) -> Self
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        Self {
            order: self.order.iter().filter(|k| (*k).borrow() != key).cloned().collect(),
            entries: self.entries.without(key),
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .filter_map(move |k| self.entries.get(k).map(|v| (k, v)))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// The longest prefix of entries for which `pred` has not yet returned
    /// true.  The first matching entry is *excluded*; if nothing matches,
    /// the whole map is returned.
    pub fn take_until<F>(&self, mut pred: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = Self::new();
        for (k, v) in self.iter() {
            if pred(k, v) {
                break;
            }
            out = out.set(k.clone(), v.clone());
        }
        out
    }

    /// The suffix of entries starting at the first entry for which `pred`
    /// returns true (*inclusive*); empty if nothing matches.
    pub fn skip_until<F>(&self, mut pred: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut out = Self::new();
        let mut matched = false;
        for (k, v) in self.iter() {
            if !matched && pred(k, v) {
                matched = true;
            }
            if matched {
                out = out.set(k.clone(), v.clone());
            }
        }
        out
    }

    /// Drop the first `count` entries.
    pub fn skip(&self, count: usize) -> Self {
        let mut out = Self::new();
        for (k, v) in self.iter().skip(count) {
            out = out.set(k.clone(), v.clone());
        }
        out
    }

    /// The entries at positions `range` in iteration order.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let mut out = Self::new();
        let len = range.len();
        for (k, v) in self.iter().skip(range.start).take(len) {
            out = out.set(k.clone(), v.clone());
        }
        out
    }

    /// Append another map's entries after this map's.
    ///
    /// A key present in both keeps its position in `self` and takes the
    /// value from `other`.
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (k, v) in other.iter() {
            out = out.set(k.clone(), v.clone());
        }
        out
    }
}

// ── Trait impls ────────────────────────────────────────────────────────────

impl<K, V> Clone for OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<K, V> Default for OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.entries == other.entries
    }
}

impl<K, V> Eq for OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + Eq,
{
}

impl<K, V> fmt::Debug for OrdMap<K, V>
where
    K: Clone + Hash + Eq + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for OrdMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().merge(iter)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abc() -> OrdMap<String, u32> {
        OrdMap::new()
            .set("a".to_string(), 1)
            .set("b".to_string(), 2)
            .set("c".to_string(), 3)
    }

    fn keys_of(map: &OrdMap<String, u32>) -> Vec<String> {
        map.keys().cloned().collect()
    }

    #[test]
    fn get_absent_is_none() {
        let map = abc();
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("zzz"), None);
    }

    #[test]
    fn set_appends_fresh_keys_in_order() {
        let map = abc();
        assert_eq!(keys_of(&map), vec!["a", "b", "c"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn set_existing_key_keeps_position() {
        let map = abc().set("a".to_string(), 99);
        assert_eq!(keys_of(&map), vec!["a", "b", "c"]);
        assert_eq!(map.get("a"), Some(&99));
    }

    #[test]
    fn set_does_not_mutate_receiver() {
        let map = abc();
        let updated = map.set("d".to_string(), 4);
        assert_eq!(map.len(), 3);
        assert_eq!(updated.len(), 4);
        assert_eq!(map.get("d"), None);
    }

    #[test]
    fn merge_overlays_pairwise() {
        let map = abc().merge(vec![("b".to_string(), 20), ("d".to_string(), 4)]);
        assert_eq!(keys_of(&map), vec!["a", "b", "c", "d"]);
        assert_eq!(map.get("b"), Some(&20));
        assert_eq!(map.get("d"), Some(&4));
    }

    #[test]
    fn remove_drops_key_and_order_slot() {
        let map = abc().remove("b");
        assert_eq!(keys_of(&map), vec!["a", "c"]);
        assert_eq!(map.get("b"), None);
        // removing an absent key is a no-op
        assert_eq!(map.remove("zzz"), map);
    }

    #[test]
    fn position_of_follows_insertion_order() {
        let map = abc();
        assert_eq!(map.position_of("a"), Some(0));
        assert_eq!(map.position_of("c"), Some(2));
        assert_eq!(map.position_of("zzz"), None);
    }

    #[test]
    fn take_until_excludes_first_match() {
        let map = abc();
        let prefix = map.take_until(|k, _| k == "b");
        assert_eq!(keys_of(&prefix), vec!["a"]);
    }

    #[test]
    fn take_until_without_match_is_whole_map() {
        let map = abc();
        assert_eq!(map.take_until(|_, _| false), map);
    }

    #[test]
    fn skip_until_includes_first_match() {
        let map = abc();
        let suffix = map.skip_until(|k, _| k == "b");
        assert_eq!(keys_of(&suffix), vec!["b", "c"]);
    }

    #[test]
    fn skip_until_without_match_is_empty() {
        let map = abc();
        assert!(map.skip_until(|_, _| false).is_empty());
    }

    #[test]
    fn skip_and_slice_are_positional() {
        let map = abc();
        assert_eq!(keys_of(&map.skip(1)), vec!["b", "c"]);
        assert_eq!(keys_of(&map.slice(1..3)), vec!["b", "c"]);
        assert_eq!(keys_of(&map.slice(0..1)), vec!["a"]);
        assert!(map.slice(3..3).is_empty());
    }

    #[test]
    fn concat_appends_and_duplicate_keeps_position() {
        let left = abc();
        let right = OrdMap::new()
            .set("d".to_string(), 4)
            .set("a".to_string(), 100);
        let joined = left.concat(&right);
        assert_eq!(keys_of(&joined), vec!["a", "b", "c", "d"]);
        assert_eq!(joined.get("a"), Some(&100));
    }

    #[test]
    fn from_iterator_roundtrip() {
        let map: OrdMap<String, u32> =
            vec![("x".to_string(), 1), ("y".to_string(), 2)].into_iter().collect();
        assert_eq!(keys_of(&map), vec!["x", "y"]);
    }

    // ── Partition properties ─────────────────────────────────────────────

    proptest! {
        /// `take_until(p)` and `skip_until(p)` split a map into two pieces
        /// that `concat` back into the original, whether or not the
        /// predicate ever matches.
        #[test]
        fn take_skip_concat_partitions(
            keys in proptest::collection::btree_set("[a-e][0-9]", 0..10),
            pivot in "[a-e][0-9]",
        ) {
            let map: OrdMap<String, usize> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), i))
                .collect();
            let prefix = map.take_until(|k, _| *k == pivot);
            let suffix = map.skip_until(|k, _| *k == pivot);
            prop_assert_eq!(prefix.len() + suffix.len(), map.len());
            prop_assert_eq!(prefix.concat(&suffix), map);
        }

        /// Updating existing keys never changes iteration order.
        #[test]
        fn update_preserves_order(
            keys in proptest::collection::btree_set("[a-e][0-9]", 1..10),
            value in 0usize..1000,
        ) {
            let map: OrdMap<String, usize> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), i))
                .collect();
            let before: Vec<String> = map.keys().cloned().collect();
            let target = keys.iter().next().unwrap().clone();
            let updated = map.set(target, value);
            let after: Vec<String> = updated.keys().cloned().collect();
            prop_assert_eq!(before, after);
        }
    }
}
