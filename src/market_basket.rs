//! End-to-end analysis over labelled rows: encode, mine, derive rules.

use serde::Serialize;
use tracing::info;

use crate::cancellation::CancellationToken;
use crate::config::MiningConfig;
use crate::error::{MiningError, MiningResult};
use crate::item_sets::{
    Apriori, AprioriConfig, AssociationRule, FrequentItemSet, ItemEncoder, ItemSet, ItemSetMiner,
    RuleGenerator, TransactionStore,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledItemSet {
    pub items: Vec<String>,
    pub support: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledRule {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub itemsets: Vec<LabelledItemSet>,
    /// Empty when no itemset of two or more items was frequent.
    pub rules: Vec<LabelledRule>,
}

#[derive(Debug, Clone, Default)]
pub struct MarketBasket {
    cancel: Option<CancellationToken>,
}

impl MarketBasket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn analyze<R, S>(&self, rows: &[R], config: &MiningConfig) -> MiningResult<AnalysisReport>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        config.validate()?;

        let encoder = ItemEncoder::fit(rows)?;
        let store = TransactionStore::new(encoder.encode(rows)?)?;

        let mut miner = Apriori::new(AprioriConfig {
            max_len: config.max_len,
            parallel: config.effective_parallel(),
            cancel: self.cancel.clone(),
        });
        let table = miner.mine(&store, config.effective_min_support())?;

        let generator = RuleGenerator::new(config.effective_metric(), config.effective_min_threshold())?
            .parallel(config.effective_parallel())
            .with_store(&store);
        let rules = match generator.generate(&table) {
            Ok(rules) => rules,
            Err(MiningError::EmptyFrequentSet) => {
                info!("no frequent itemset supports a rule");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        Ok(AnalysisReport {
            itemsets: table.iter().map(|r| label_itemset(&encoder, r)).collect(),
            rules: rules.iter().map(|r| label_rule(&encoder, r)).collect(),
        })
    }
}

fn labels(encoder: &ItemEncoder, itemset: &ItemSet) -> Vec<String> {
    encoder.decode(itemset).into_iter().map(str::to_owned).collect()
}

fn label_itemset(encoder: &ItemEncoder, record: &FrequentItemSet) -> LabelledItemSet {
    LabelledItemSet { items: labels(encoder, &record.items), support: record.support }
}

fn label_rule(encoder: &ItemEncoder, rule: &AssociationRule) -> LabelledRule {
    LabelledRule {
        antecedents: labels(encoder, &rule.antecedent),
        consequents: labels(encoder, &rule.consequent),
        antecedent_support: rule.antecedent_support,
        consequent_support: rule.consequent_support,
        support: rule.support,
        confidence: rule.confidence,
        lift: rule.lift,
    }
}
