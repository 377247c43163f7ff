//! Read-only transaction collection with a vertical item index.

use rustc_hash::FxHashMap;

use crate::error::{to_u32, MiningError, MiningResult};

use super::itemset::{Item, ItemSet};

/// Holds the transactions in input order.
///
/// Alongside the rows it keeps, per item, the ascending list of
/// transaction ids that contain it. Support counts are intersections of
/// those lists and always equal a full scan.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    transactions: Vec<ItemSet>,
    tids: FxHashMap<Item, Vec<u32>>,
    items: Vec<Item>,
}

impl TransactionStore {
    /// Fails on an empty collection, or on more than `u32::MAX + 1`
    /// transactions (ids are indexed as `u32`).
    pub fn new(transactions: Vec<ItemSet>) -> MiningResult<Self> {
        if transactions.is_empty() {
            return Err(MiningError::EmptyInput);
        }

        let mut tids: FxHashMap<Item, Vec<u32>> = FxHashMap::default();
        for (tid, transaction) in transactions.iter().enumerate() {
            let tid = to_u32(tid, "transactions")?;
            for item in transaction.items() {
                tids.entry(*item).or_default().push(tid);
            }
        }
        let mut items: Vec<Item> = tids.keys().copied().collect();
        items.sort_unstable();

        Ok(Self { transactions, tids, items })
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transactions(&self) -> &[ItemSet] {
        &self.transactions
    }

    /// Every item seen in at least one transaction, ascending.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn max_transaction_len(&self) -> usize {
        self.transactions.iter().map(ItemSet::len).max().unwrap_or(0)
    }

    /// Out-of-range indices contain nothing.
    pub fn contains(&self, transaction_index: usize, itemset: &ItemSet) -> bool {
        self.transactions
            .get(transaction_index)
            .is_some_and(|t| itemset.is_subset_of(t))
    }

    /// Number of transactions containing `itemset`, via the item index.
    pub fn support_count(&self, itemset: &ItemSet) -> usize {
        let mut lists = Vec::with_capacity(itemset.len());
        for item in itemset.items() {
            match self.tids.get(item) {
                Some(list) => lists.push(list.as_slice()),
                None => return 0,
            }
        }
        lists.sort_unstable_by_key(|list| list.len());

        let Some((first, rest)) = lists.split_first() else {
            return self.transaction_count();
        };
        let mut acc: Vec<u32> = first.to_vec();
        for list in rest {
            acc = intersect(&acc, list);
            if acc.is_empty() {
                break;
            }
        }
        acc.len()
    }

    /// Number of transactions containing `itemset`, by scanning every row.
    pub fn support_count_scan(&self, itemset: &ItemSet) -> usize {
        self.transactions
            .iter()
            .filter(|t| itemset.is_subset_of(t))
            .count()
    }

    pub fn support(&self, itemset: &ItemSet) -> f64 {
        self.support_count(itemset) as f64 / self.transaction_count() as f64
    }
}

fn intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
