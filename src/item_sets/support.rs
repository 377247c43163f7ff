//! Support counting for one level of candidates.

use rayon::prelude::*;

use crate::cancellation::{Cancellable, CancellationToken};
use crate::error::{MiningError, MiningResult};

use super::itemset::ItemSet;
use super::store::TransactionStore;

/// Transactions per parallel work unit.
const CHUNK_SIZE: usize = 4096;

/// Counts candidate supports against a shared, read-only store.
#[derive(Debug, Clone)]
pub struct SupportCounter<'a> {
    store: &'a TransactionStore,
    parallel: bool,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> SupportCounter<'a> {
    pub fn new(store: &'a TransactionStore) -> Self {
        Self { store, parallel: false, cancel: None }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancellation(mut self, token: Option<&'a CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Raw counts, aligned with `candidates`. `level` is only used to
    /// report where a cancellation happened.
    pub fn counts(&self, candidates: &[ItemSet], level: usize) -> MiningResult<Vec<usize>> {
        if self.parallel {
            self.counts_partitioned(candidates, level)
        } else {
            self.check_cancelled(level)?;
            Ok(candidates.iter().map(|c| self.store.support_count(c)).collect())
        }
    }

    /// Candidate supports as fractions of the transaction count.
    pub fn supports(&self, candidates: &[ItemSet], level: usize) -> MiningResult<Vec<f64>> {
        let total = self.store.transaction_count() as f64;
        Ok(self
            .counts(candidates, level)?
            .into_iter()
            .map(|count| count as f64 / total)
            .collect())
    }

    /// Each chunk of transactions produces a partial count vector; the
    /// partials are summed. No counter is shared between workers.
    fn counts_partitioned(&self, candidates: &[ItemSet], level: usize) -> MiningResult<Vec<usize>> {
        self.store
            .transactions()
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| -> MiningResult<Vec<usize>> {
                self.check_cancelled(level)?;
                Ok(candidates
                    .iter()
                    .map(|candidate| chunk.iter().filter(|t| candidate.is_subset_of(t)).count())
                    .collect::<Vec<usize>>())
            })
            .try_reduce(
                || vec![0; candidates.len()],
                |mut acc, partial| {
                    acc.iter_mut().zip(partial).for_each(|(a, p)| *a += p);
                    Ok(acc)
                },
            )
    }

    fn check_cancelled(&self, level: usize) -> MiningResult<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(MiningError::Cancelled { level }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(rows: usize) -> TransactionStore {
        let transactions = (0..rows)
            .map(|i| ItemSet::new((0..6u32).filter(|item| (i as u32 + 1) % (item + 1) == 0)))
            .collect();
        TransactionStore::new(transactions).unwrap()
    }

    #[test]
    fn partitioned_matches_indexed() {
        let store = store(10_000);
        let candidates = vec![
            ItemSet::single(0),
            ItemSet::single(1),
            ItemSet::new([1, 2]),
            ItemSet::new([1, 2, 5]),
            ItemSet::new([3, 4]),
        ];
        let sequential = SupportCounter::new(&store).counts(&candidates, 1).unwrap();
        let parallel = SupportCounter::new(&store).parallel(true).counts(&candidates, 1).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0], 10_000);
    }

    #[test]
    fn supports_are_fractions() {
        let store = store(4);
        let supports = SupportCounter::new(&store).supports(&[ItemSet::single(1)], 1).unwrap();
        assert_eq!(supports, vec![0.5]);
    }

    #[test]
    fn cancelled_token_stops_counting() {
        let store = store(100);
        let token = CancellationToken::new();
        token.cancel();
        for parallel in [false, true] {
            let err = SupportCounter::new(&store)
                .parallel(parallel)
                .with_cancellation(Some(&token))
                .counts(&[ItemSet::single(0)], 3)
                .unwrap_err();
            assert_eq!(err, MiningError::Cancelled { level: 3 });
        }
    }
}
