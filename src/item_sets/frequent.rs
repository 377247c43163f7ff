use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::itemset::ItemSet;

/// An itemset that met the minimum support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemSet {
    pub items: ItemSet,
    /// Transactions containing `items`. Ratios between itemsets are
    /// taken from counts so they round once.
    pub count: usize,
    pub support: f64,
}

impl FrequentItemSet {
    pub fn new(items: ItemSet, count: usize, transaction_count: usize) -> Self {
        let support = count as f64 / transaction_count as f64;
        Self { items, count, support }
    }
}

/// Output of a mining run: records in presentation order (size, then
/// item order) plus a count lookup.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemSets {
    records: Vec<FrequentItemSet>,
    index: FxHashMap<ItemSet, usize>,
    transaction_count: usize,
}

impl FrequentItemSets {
    pub fn from_records(mut records: Vec<FrequentItemSet>, transaction_count: usize) -> Self {
        records.sort_by(|a, b| a.items.canonical_cmp(&b.items));
        records.dedup_by(|a, b| a.items == b.items);
        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.items.clone(), i))
            .collect();
        Self { records, index, transaction_count }
    }

    /// Size of the transaction collection the records were counted over.
    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn records(&self) -> &[FrequentItemSet] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FrequentItemSet> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequentItemSet> {
        self.records.iter()
    }

    pub fn support_of(&self, itemset: &ItemSet) -> Option<f64> {
        self.index.get(itemset).map(|i| self.records[*i].support)
    }

    pub fn count_of(&self, itemset: &ItemSet) -> Option<usize> {
        self.index.get(itemset).map(|i| self.records[*i].count)
    }

    pub fn of_size(&self, size: usize) -> impl Iterator<Item = &FrequentItemSet> {
        self.records.iter().filter(move |r| r.items.len() == size)
    }

    pub fn max_len(&self) -> usize {
        self.records.last().map_or(0, |r| r.items.len())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a FrequentItemSets {
    type Item = &'a FrequentItemSet;
    type IntoIter = std::slice::Iter<'a, FrequentItemSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
