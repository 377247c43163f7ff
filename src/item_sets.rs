mod apriori;
mod candidates;
mod encoder;
mod frequent;
mod itemset;
mod rules;
mod store;
mod support;

pub use apriori::{Apriori, AprioriConfig, LevelStats};
pub use candidates::{generate as generate_candidates, initial_candidates};
pub use encoder::ItemEncoder;
pub use frequent::{FrequentItemSet, FrequentItemSets};
pub use itemset::{Item, ItemSet};
pub use rules::{AssociationRule, Metric, RuleGenerator};
pub use store::TransactionStore;
pub use support::SupportCounter;

use crate::error::MiningResult;

pub trait ItemSetMiner {
    fn mine(&mut self, store: &TransactionStore, min_support: f64) -> MiningResult<FrequentItemSets>;
}
