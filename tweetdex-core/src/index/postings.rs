//! Sorted timestamp sets and merge-join set algebra.

use smallvec::SmallVec;
use tweetdex_types::Timestamp;

/// A set of document timestamps, stored as a strictly ascending vector.
///
/// Posting lists, the universe and every intermediate query result share
/// this representation, so `AND`, `OR` and complement are single linear
/// merge passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocSet {
    ids: Vec<Timestamp>,
}

impl DocSet {
    /// Creates an empty set.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Builds a set from arbitrary timestamps: sorts and removes duplicates.
    pub fn from_unsorted(mut ids: Vec<Timestamp>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Returns the number of timestamps in the set.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the set is empty.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the timestamps in ascending order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.ids
    }

    /// Iterates in ascending order.
    #[inline(always)]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Timestamp>> {
        self.ids.iter().copied()
    }

    /// Iterates the `k` most recent timestamps, newest first.
    #[inline(always)]
    pub fn newest(&self, k: usize) -> impl Iterator<Item = Timestamp> + '_ {
        self.ids.iter().rev().take(k).copied()
    }

    /// Returns `true` if `timestamp` is in the set.
    #[inline(always)]
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.ids.binary_search(&timestamp).is_ok()
    }

    /// Returns `true` if every timestamp of `self` is also in `other`.
    pub fn is_subset(&self, other: &DocSet) -> bool {
        self.difference(other).is_empty()
    }

    /// Set intersection (`AND`).
    pub fn intersect(&self, other: &DocSet) -> DocSet {
        let (a, b) = (&self.ids, &other.ids);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let mut ai = 0usize;
        let mut bi = 0usize;

        while ai < a.len() && bi < b.len() {
            match a[ai].cmp(&b[bi]) {
                std::cmp::Ordering::Less => ai += 1,
                std::cmp::Ordering::Greater => bi += 1,
                std::cmp::Ordering::Equal => {
                    out.push(a[ai]);
                    ai += 1;
                    bi += 1;
                }
            }
        }

        DocSet { ids: out }
    }

    /// Set union (`OR`).
    pub fn union(&self, other: &DocSet) -> DocSet {
        let (a, b) = (&self.ids, &other.ids);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let mut ai = 0usize;
        let mut bi = 0usize;

        while ai < a.len() && bi < b.len() {
            match a[ai].cmp(&b[bi]) {
                std::cmp::Ordering::Less => {
                    out.push(a[ai]);
                    ai += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[bi]);
                    bi += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push(a[ai]);
                    ai += 1;
                    bi += 1;
                }
            }
        }

        out.extend_from_slice(&a[ai..]);
        out.extend_from_slice(&b[bi..]);
        DocSet { ids: out }
    }

    /// Set difference: timestamps of `self` not in `other`.
    ///
    /// Negation is `universe.difference(set)`.
    pub fn difference(&self, other: &DocSet) -> DocSet {
        let (a, b) = (&self.ids, &other.ids);
        let mut out = Vec::with_capacity(a.len());
        let mut bi = 0usize;

        for &id in a {
            while bi < b.len() && b[bi] < id {
                bi += 1;
            }
            if bi < b.len() && b[bi] == id {
                bi += 1;
            } else {
                out.push(id);
            }
        }

        DocSet { ids: out }
    }
}

impl FromIterator<Timestamp> for DocSet {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

impl From<Vec<Timestamp>> for DocSet {
    fn from(ids: Vec<Timestamp>) -> Self {
        Self::from_unsorted(ids)
    }
}

impl<'a> IntoIterator for &'a DocSet {
    type Item = Timestamp;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Timestamp>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects the `k` most recent timestamps of `set` into an inline buffer.
#[inline]
pub(crate) fn newest_inline(set: &DocSet, k: usize) -> SmallVec<[Timestamp; 8]> {
    set.newest(k).collect()
}
