//! Property tests for mining and rule generation.

use std::collections::BTreeMap;

use proptest::prelude::*;

use pate::item_sets::{
    Apriori, AprioriConfig, FrequentItemSets, ItemSet, ItemSetMiner, Metric, RuleGenerator, TransactionStore,
};
use pate::MiningError;

const UNIVERSE: u32 = 6;

fn transactions() -> impl Strategy<Value = Vec<ItemSet>> {
    prop::collection::vec(prop::collection::vec(0..UNIVERSE, 0..5), 1..24)
        .prop_map(|rows| rows.into_iter().map(ItemSet::new).collect())
}

fn min_support() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.05, 0.1, 0.25, 1.0 / 3.0, 0.5, 0.75, 1.0])
}

fn as_map(table: &FrequentItemSets) -> BTreeMap<Vec<u32>, f64> {
    table.iter().map(|r| (r.items.items().to_vec(), r.support)).collect()
}

/// Counts every subset of the item universe by scanning.
fn brute_force(store: &TransactionStore, min_support: f64) -> BTreeMap<Vec<u32>, f64> {
    let total = store.transaction_count() as f64;
    let max_len = store.max_transaction_len();
    (1u32..(1 << UNIVERSE))
        .map(|mask| ItemSet::new((0..UNIVERSE).filter(|i| mask & (1 << i) != 0)))
        .filter(|set| set.len() <= max_len)
        .filter_map(|set| {
            let support = store.support_count_scan(&set) as f64 / total;
            (support >= min_support).then(|| (set.items().to_vec(), support))
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_matches_brute_force(rows in transactions(), min_support in min_support()) {
        let store = TransactionStore::new(rows).unwrap();
        let table = Apriori::default().mine(&store, min_support).unwrap();
        prop_assert_eq!(as_map(&table), brute_force(&store, min_support));
    }

    #[test]
    fn prop_subsets_of_frequent_are_frequent(rows in transactions(), min_support in min_support()) {
        let store = TransactionStore::new(rows).unwrap();
        let table = Apriori::default().mine(&store, min_support).unwrap();
        for record in &table {
            prop_assert!(record.support >= min_support);
            prop_assert!(record.support > 0.0 && record.support <= 1.0);
            for subset in record.items.drop_one_subsets().filter(|s| !s.is_empty()) {
                let sub_support = table.support_of(&subset);
                prop_assert!(sub_support.is_some(), "subset {} of {} missing", subset, record.items);
                prop_assert!(sub_support.unwrap() >= record.support);
            }
        }
    }

    #[test]
    fn prop_index_agrees_with_scan(rows in transactions(), probe in prop::collection::vec(0..UNIVERSE, 0..4)) {
        let store = TransactionStore::new(rows).unwrap();
        let probe = ItemSet::new(probe);
        prop_assert_eq!(store.support_count(&probe), store.support_count_scan(&probe));
    }

    #[test]
    fn prop_deterministic_and_parallel_equivalent(rows in transactions(), min_support in min_support()) {
        let store = TransactionStore::new(rows).unwrap();
        let first = Apriori::default().mine(&store, min_support).unwrap();
        let second = Apriori::default().mine(&store, min_support).unwrap();
        let parallel = Apriori::new(AprioriConfig { parallel: true, ..Default::default() })
            .mine(&store, min_support)
            .unwrap();
        prop_assert_eq!(first.records(), second.records());
        prop_assert_eq!(first.records(), parallel.records());
    }

    #[test]
    fn prop_rule_invariants(
        rows in transactions(),
        min_support in min_support(),
        min_confidence in prop::sample::select(vec![0.1, 0.5, 0.8, 1.0]),
    ) {
        let store = TransactionStore::new(rows).unwrap();
        let table = Apriori::default().mine(&store, min_support).unwrap();
        let generator = RuleGenerator::new(Metric::Confidence, min_confidence).unwrap();
        let rules = match generator.generate(&table) {
            Ok(rules) => rules,
            Err(MiningError::EmptyFrequentSet) => {
                prop_assert!(table.iter().all(|r| r.items.len() < 2));
                return Ok(());
            }
            Err(err) => return Err(TestCaseError::fail(err.to_string())),
        };

        for rule in &rules {
            prop_assert!(!rule.antecedent.is_empty() && !rule.consequent.is_empty());
            prop_assert!(rule.antecedent.difference(&rule.consequent) == rule.antecedent);
            let union = rule.antecedent.union(&rule.consequent);
            prop_assert_eq!(table.support_of(&union), Some(rule.support));
            prop_assert!(rule.confidence > 0.0 && rule.confidence <= 1.0 + 1e-12);
            prop_assert!(rule.confidence >= min_confidence);
            let (joint, antecedent) = (table.count_of(&union).unwrap(), table.count_of(&rule.antecedent).unwrap());
            prop_assert_eq!(rule.confidence, joint as f64 / antecedent as f64);
            prop_assert!(rule.support <= rule.antecedent_support);
            prop_assert!((rule.lift - rule.confidence / rule.consequent_support).abs() < 1e-12);
        }

        // Pruned enumeration finds exactly the rules an exhaustive pass would.
        let expected: usize = table
            .iter()
            .filter(|r| r.items.len() >= 2)
            .map(|r| {
                r.items
                    .proper_subsets()
                    .into_iter()
                    .filter(|a| r.count as f64 / table.count_of(a).unwrap() as f64 >= min_confidence)
                    .count()
            })
            .sum();
        prop_assert_eq!(rules.len(), expected);
    }
}
