//! Level-wise frequent itemset mining.
//!
//! Each level counts its candidates, keeps those at or above the
//! minimum support, and joins the survivors into the next level's
//! candidates. The loop stops once a level keeps nothing or the size
//! limit (largest transaction, or `max_len` if smaller) is reached.

use tracing::{debug, info, warn};

use crate::cancellation::{Cancellable, CancellationToken};
use crate::error::{check_unit_threshold, MiningError, MiningResult};

use super::candidates;
use super::frequent::{FrequentItemSet, FrequentItemSets};
use super::itemset::ItemSet;
use super::store::TransactionStore;
use super::support::SupportCounter;
use super::ItemSetMiner;

#[derive(Debug, Clone, Default)]
pub struct AprioriConfig {
    /// Largest itemset size to mine. `None` means unbounded.
    pub max_len: Option<usize>,
    /// Count supports on the rayon pool.
    pub parallel: bool,
    pub cancel: Option<CancellationToken>,
}

/// Counts for one completed level of the last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub level: usize,
    pub candidates: usize,
    pub frequent: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Apriori {
    config: AprioriConfig,
    levels: Vec<LevelStats>,
}

impl Apriori {
    pub fn new(config: AprioriConfig) -> Self {
        Self { config, levels: Vec::new() }
    }

    /// Per-level counts of the most recent successful run.
    pub fn level_stats(&self) -> &[LevelStats] {
        &self.levels
    }

    fn is_cancelled(&self) -> bool {
        self.config.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

impl ItemSetMiner for Apriori {
    fn mine(&mut self, store: &TransactionStore, min_support: f64) -> MiningResult<FrequentItemSets> {
        check_unit_threshold("min_support", min_support)?;
        if self.config.max_len == Some(0) {
            return Err(MiningError::InvalidConfig("max_len must be at least 1".into()));
        }

        let size_cap = self
            .config
            .max_len
            .map_or(store.max_transaction_len(), |cap| cap.min(store.max_transaction_len()));
        info!(
            transactions = store.transaction_count(),
            items = store.items().len(),
            min_support,
            size_cap,
            "mining frequent itemsets"
        );

        let counter = SupportCounter::new(store)
            .parallel(self.config.parallel)
            .with_cancellation(self.config.cancel.as_ref());

        let total = store.transaction_count();
        let mut accepted: Vec<FrequentItemSet> = Vec::new();
        let mut levels = Vec::new();
        let mut level = 1;
        let mut current = candidates::initial_candidates(store);

        while !current.is_empty() && level <= size_cap {
            if self.is_cancelled() {
                warn!(level, "mining cancelled");
                return Err(MiningError::Cancelled { level });
            }

            let candidate_count = current.len();
            let counts = counter.counts(&current, level)?;
            let frequent: Vec<FrequentItemSet> = current
                .into_iter()
                .zip(counts)
                .map(|(items, count)| FrequentItemSet::new(items, count, total))
                .filter(|record| record.support >= min_support)
                .collect();

            debug!(level, candidates = candidate_count, frequent = frequent.len(), "level complete");
            levels.push(LevelStats { level, candidates: candidate_count, frequent: frequent.len() });

            let keys: Vec<ItemSet> = frequent.iter().map(|r| r.items.clone()).collect();
            accepted.extend(frequent);
            current = if level < size_cap { candidates::generate(&keys) } else { Vec::new() };
            level += 1;
        }

        let table = FrequentItemSets::from_records(accepted, total);
        info!(frequent = table.len(), levels = levels.len(), "mining finished");
        self.levels = levels;
        Ok(table)
    }
}
