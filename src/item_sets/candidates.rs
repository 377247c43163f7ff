//! Level-wise join-and-prune candidate generation.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::itemset::ItemSet;
use super::store::TransactionStore;

/// Level-1 candidates: every item observed in the store.
pub fn initial_candidates(store: &TransactionStore) -> Vec<ItemSet> {
    store.items().iter().map(|item| ItemSet::single(*item)).collect()
}

/// Builds the (k+1)-candidates from the frequent k-itemsets.
///
/// Two k-itemsets join when they share their first k-1 items; the
/// result is kept only if every k-subset is itself frequent.
pub fn generate(frequent: &[ItemSet]) -> Vec<ItemSet> {
    if frequent.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&ItemSet> = frequent.iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    let known: FxHashSet<&ItemSet> = sorted.iter().copied().collect();

    let mut candidates = Vec::new();
    for (i, left) in sorted.iter().enumerate() {
        // Sorted order groups equal prefixes into contiguous runs.
        for right in sorted[i + 1..].iter().take_while(|r| r.prefix() == left.prefix()) {
            let Some(last) = right.last() else { continue };
            let candidate = left.extended_with(last);
            if candidate.drop_one_subsets().all(|subset| known.contains(&subset)) {
                candidates.push(candidate);
            } else {
                trace!(%candidate, "pruned candidate with infrequent subset");
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(raw: &[&[u32]]) -> Vec<ItemSet> {
        raw.iter().map(|s| ItemSet::new(s.iter().copied())).collect()
    }

    #[test]
    fn joins_singletons_pairwise() {
        let out = generate(&sets(&[&[0], &[1], &[2]]));
        assert_eq!(out, sets(&[&[0, 1], &[0, 2], &[1, 2]]));
    }

    #[test]
    fn prunes_candidate_with_infrequent_subset() {
        // {1,2} is missing, so {0,1,2} cannot survive.
        let out = generate(&sets(&[&[0, 1], &[0, 2]]));
        assert!(out.is_empty());

        let out = generate(&sets(&[&[0, 1], &[0, 2], &[1, 2]]));
        assert_eq!(out, sets(&[&[0, 1, 2]]));
    }

    #[test]
    fn only_joins_matching_prefixes() {
        let out = generate(&sets(&[&[0, 1], &[1, 2], &[0, 2], &[2, 3]]));
        assert_eq!(out, sets(&[&[0, 1, 2]]));
    }

    #[test]
    fn empty_and_duplicate_input() {
        assert!(generate(&[]).is_empty());
        let out = generate(&sets(&[&[1], &[0], &[1]]));
        assert_eq!(out, sets(&[&[0, 1]]));
    }

    #[test]
    fn initial_candidates_cover_store_items() {
        let store = TransactionStore::new(sets(&[&[4, 2], &[7]])).unwrap();
        assert_eq!(initial_candidates(&store), sets(&[&[2], &[4], &[7]]));
    }
}
