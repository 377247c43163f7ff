use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Dense surrogate for an item label. Ordering follows label ordering
/// when produced by [`ItemEncoder`](super::ItemEncoder).
pub type Item = u32;

/// An immutable set of distinct items.
///
/// Items are kept sorted and deduplicated, so equality and hashing are
/// set semantics. The ordering exists for deterministic enumeration only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemSet(SmallVec<[Item; 4]>);

impl ItemSet {
    pub fn new<I: IntoIterator<Item = Item>>(items: I) -> Self {
        let mut items: SmallVec<[Item; 4]> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn single(item: Item) -> Self {
        let mut items = SmallVec::new();
        items.push(item);
        Self(items)
    }

    /// Builds from items already in strictly ascending order.
    fn from_sorted(items: SmallVec<[Item; 4]>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Items in canonical order.
    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn contains(&self, item: Item) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    /// Merge-walk subset test over the two sorted sequences.
    pub fn is_subset_of(&self, other: &ItemSet) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut theirs = other.0.iter();
        'outer: for item in &self.0 {
            for candidate in theirs.by_ref() {
                if candidate == item {
                    continue 'outer;
                }
                if candidate > item {
                    return false;
                }
            }
            return false;
        }
        true
    }

    pub fn union(&self, other: &ItemSet) -> ItemSet {
        ItemSet::new(self.0.iter().chain(other.0.iter()).copied())
    }

    pub fn difference(&self, other: &ItemSet) -> ItemSet {
        ItemSet::from_sorted(self.0.iter().copied().filter(|i| !other.contains(*i)).collect())
    }

    /// Every subset with exactly one item removed.
    pub fn drop_one_subsets(&self) -> impl Iterator<Item = ItemSet> + '_ {
        (0..self.len()).map(move |skip| {
            ItemSet::from_sorted(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, item)| *item)
                    .collect(),
            )
        })
    }

    /// Every non-empty proper subset, smallest first.
    pub fn proper_subsets(&self) -> Vec<ItemSet> {
        let n = self.len();
        if n < 2 {
            return Vec::new();
        }
        let mut subsets: Vec<ItemSet> = (1u64..(1u64 << n) - 1)
            .map(|mask| {
                ItemSet::from_sorted(
                    self.0
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, item)| *item)
                        .collect(),
                )
            })
            .collect();
        subsets.sort_unstable_by(|a, b| a.canonical_cmp(b));
        subsets
    }

    /// All items but the last; the join key for candidate generation.
    pub fn prefix(&self) -> &[Item] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn last(&self) -> Option<Item> {
        self.0.last().copied()
    }

    /// Appends an item greater than every current member.
    pub(crate) fn extended_with(&self, item: Item) -> ItemSet {
        let mut items = self.0.clone();
        items.push(item);
        ItemSet::from_sorted(items)
    }

    /// Presentation order: ascending size, then item order.
    pub fn canonical_cmp(&self, other: &ItemSet) -> std::cmp::Ordering {
        self.len().cmp(&other.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl FromIterator<Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        ItemSet::new(iter)
    }
}

impl<'de> Deserialize<'de> for ItemSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Item>::deserialize(deserializer).map(ItemSet::new)
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("}")
    }
}
