//! Canonicalization, deduplication and grouping of unordered stop pairs.
//!
//! Proximity is symmetric, so a scan reports both `(a, b)` and `(b, a)`. Each
//! pair is stored once as `(min, max)` under the key's `Ord`, and the set is
//! grouped by its smaller element. Both levels use ordered collections, which
//! makes iteration, and therefore any batch plan derived from it, reproducible.

use std::collections::{BTreeMap, BTreeSet};

/// Destinations grouped under their canonical source, both sorted.
pub type PairGroups<K> = BTreeMap<K, Vec<K>>;

/// Collects raw `(center, neighbor)` ids into a set of canonical pairs.
///
/// # Examples
///
/// ```
/// use walkways::PairDeduplicator;
///
/// let mut pairs = PairDeduplicator::new();
/// pairs.push("b", "a");
/// pairs.push("a", "b");
/// pairs.push("a", "a");
///
/// assert_eq!(pairs.len(), 1);
/// let groups = pairs.into_groups();
/// assert_eq!(groups["a"], vec!["b"]);
/// ```
#[derive(Debug, Clone)]
pub struct PairDeduplicator<K> {
    pairs: BTreeSet<(K, K)>,
    self_pairs: usize,
}

impl<K: Ord> PairDeduplicator<K> {
    pub fn new() -> Self {
        Self {
            pairs: BTreeSet::new(),
            self_pairs: 0,
        }
    }

    /// Record one raw pair. Returns `true` if it was new.
    ///
    /// Self-pairs (`a == b`) are discarded.
    pub fn push(&mut self, a: K, b: K) -> bool {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => {
                self.self_pairs += 1;
                false
            }
            std::cmp::Ordering::Less => self.pairs.insert((a, b)),
            std::cmp::Ordering::Greater => self.pairs.insert((b, a)),
        }
    }

    /// Number of distinct canonical pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of self-pairs discarded so far.
    pub fn self_pairs(&self) -> usize {
        self.self_pairs
    }

    pub fn contains(&self, a: &K, b: &K) -> bool
    where
        K: Clone,
    {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        self.pairs.contains(&key)
    }

    /// Canonical pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &K)> {
        self.pairs.iter().map(|(a, b)| (a, b))
    }

    /// Group the pairs by their smaller element.
    pub fn into_groups(self) -> PairGroups<K> {
        let mut groups: PairGroups<K> = BTreeMap::new();
        // The set iterates in (source, destination) order, so every group's
        // destinations arrive already sorted.
        for (source, destination) in self.pairs {
            groups.entry(source).or_default().push(destination);
        }
        groups
    }
}

impl<K: Ord> Default for PairDeduplicator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<(K, K)> for PairDeduplicator<K> {
    fn extend<I: IntoIterator<Item = (K, K)>>(&mut self, iter: I) {
        for (a, b) in iter {
            self.push(a, b);
        }
    }
}

impl<K: Ord> FromIterator<(K, K)> for PairDeduplicator<K> {
    fn from_iter<I: IntoIterator<Item = (K, K)>>(iter: I) -> Self {
        let mut pairs = Self::new();
        pairs.extend(iter);
        pairs
    }
}

/// Deduplicate a raw pair stream and group it in one step.
pub fn group_pairs<K: Ord>(raw: impl IntoIterator<Item = (K, K)>) -> PairGroups<K> {
    raw.into_iter().collect::<PairDeduplicator<K>>().into_groups()
}
