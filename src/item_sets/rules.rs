//! Association rules derived from a frequent itemset table.
//!
//! For every frequent itemset `I` with two or more items, each split
//! `A → I \ A` into non-empty parts is a candidate rule:
//!
//! - `confidence = support(I) / support(A)`
//! - `lift = confidence / support(I \ A)`
//!
//! Both are computed from transaction counts in a single division, so a
//! ratio such as 3/4 compares equal to a literal `0.75` threshold.
//!
//! When filtering on confidence, consequents are grown one item at a
//! time and a consequent that fails is never extended: moving items
//! from the antecedent to the consequent can only lower confidence.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{check_unit_threshold, MiningError, MiningResult};

use super::candidates;
use super::frequent::{FrequentItemSet, FrequentItemSets};
use super::itemset::ItemSet;
use super::store::TransactionStore;

/// The rule measure compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Support,
    #[default]
    Confidence,
    Lift,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Confidence => "confidence",
            Self::Lift => "lift",
        }
    }

    fn threshold_name(&self) -> &'static str {
        match self {
            Self::Support => "min_support",
            Self::Confidence => "min_confidence",
            Self::Lift => "min_lift",
        }
    }

    /// Support and confidence thresholds must lie in (0, 1]. Lift is an
    /// unbounded ratio, so its threshold deliberately departs from that
    /// range and only needs to be finite and positive (`1.2` is a usual
    /// filter).
    pub fn validate_threshold(&self, value: f64) -> MiningResult<()> {
        match self {
            Self::Support | Self::Confidence => check_unit_threshold(self.threshold_name(), value),
            Self::Lift if value.is_finite() && value > 0.0 => Ok(()),
            Self::Lift => Err(MiningError::InvalidThreshold { name: self.threshold_name(), value }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of `antecedent ∪ consequent`.
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

impl AssociationRule {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Support => self.support,
            Metric::Confidence => self.confidence,
            Metric::Lift => self.lift,
        }
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (support {:.3}, confidence {:.3}, lift {:.3})",
            self.antecedent, self.consequent, self.support, self.confidence, self.lift
        )
    }
}

pub struct RuleGenerator<'a> {
    metric: Metric,
    min_threshold: f64,
    parallel: bool,
    store: Option<&'a TransactionStore>,
}

impl<'a> RuleGenerator<'a> {
    /// Fails fast on a threshold outside the metric's range.
    pub fn new(metric: Metric, min_threshold: f64) -> MiningResult<Self> {
        metric.validate_threshold(min_threshold)?;
        Ok(Self { metric, min_threshold, parallel: false, store: None })
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Store used to count itemsets missing from the table.
    pub fn with_store(mut self, store: &'a TransactionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Rules for every frequent itemset of size two or more, grouped by
    /// itemset in table order, antecedents in canonical order.
    ///
    /// Returns [`MiningError::EmptyFrequentSet`] if the table holds no
    /// itemset a rule could be formed from.
    pub fn generate(&self, table: &FrequentItemSets) -> MiningResult<Vec<AssociationRule>> {
        let sources: Vec<&FrequentItemSet> = table.iter().filter(|r| r.items.len() >= 2).collect();
        if sources.is_empty() {
            return Err(MiningError::EmptyFrequentSet);
        }
        info!(
            itemsets = sources.len(),
            metric = %self.metric,
            min_threshold = self.min_threshold,
            "generating association rules"
        );

        let grouped: Vec<Vec<AssociationRule>> = if self.parallel {
            sources.par_iter().map(|r| self.rules_for(table, r)).collect::<MiningResult<_>>()?
        } else {
            sources.iter().map(|r| self.rules_for(table, r)).collect::<MiningResult<_>>()?
        };

        let rules: Vec<AssociationRule> = grouped.into_iter().flatten().collect();
        info!(rules = rules.len(), "rule generation finished");
        Ok(rules)
    }

    fn rules_for(&self, table: &FrequentItemSets, record: &FrequentItemSet) -> MiningResult<Vec<AssociationRule>> {
        let mut rules = match self.metric {
            Metric::Confidence => self.grow_consequents(table, record)?,
            Metric::Support | Metric::Lift => self.all_splits(table, record)?,
        };
        rules.sort_by(|a, b| a.antecedent.canonical_cmp(&b.antecedent));
        debug!(itemset = %record.items, rules = rules.len(), "rules for itemset");
        Ok(rules)
    }

    fn all_splits(&self, table: &FrequentItemSets, record: &FrequentItemSet) -> MiningResult<Vec<AssociationRule>> {
        let mut rules = Vec::new();
        for antecedent in record.items.proper_subsets() {
            let consequent = record.items.difference(&antecedent);
            let rule = self.build(table, record, antecedent, consequent)?;
            if rule.metric(self.metric) >= self.min_threshold {
                rules.push(rule);
            }
        }
        Ok(rules)
    }

    /// Level-wise over consequent size; only passing consequents are joined.
    fn grow_consequents(
        &self,
        table: &FrequentItemSets,
        record: &FrequentItemSet,
    ) -> MiningResult<Vec<AssociationRule>> {
        let mut rules = Vec::new();
        let mut consequents: Vec<ItemSet> = record.items.items().iter().map(|i| ItemSet::single(*i)).collect();

        while !consequents.is_empty() && consequents[0].len() < record.items.len() {
            let mut passing = Vec::with_capacity(consequents.len());
            for consequent in consequents {
                let antecedent = record.items.difference(&consequent);
                let rule = self.build(table, record, antecedent, consequent.clone())?;
                if rule.confidence >= self.min_threshold {
                    rules.push(rule);
                    passing.push(consequent);
                }
            }
            consequents = candidates::generate(&passing);
        }
        Ok(rules)
    }

    fn build(
        &self,
        table: &FrequentItemSets,
        record: &FrequentItemSet,
        antecedent: ItemSet,
        consequent: ItemSet,
    ) -> MiningResult<AssociationRule> {
        let total = table.transaction_count();
        let antecedent_count = self.count_of(table, &antecedent)?;
        let consequent_count = self.count_of(table, &consequent)?;

        // lift = (n_I / n_A) / (n_C / n) = n_I * n / (n_A * n_C)
        let lift_numerator = record.count as u128 * total as u128;
        let lift_denominator = antecedent_count as u128 * consequent_count as u128;

        Ok(AssociationRule {
            antecedent,
            consequent,
            antecedent_support: antecedent_count as f64 / total as f64,
            consequent_support: consequent_count as f64 / total as f64,
            support: record.support,
            confidence: record.count as f64 / antecedent_count as f64,
            lift: lift_numerator as f64 / lift_denominator as f64,
        })
    }

    fn count_of(&self, table: &FrequentItemSets, itemset: &ItemSet) -> MiningResult<usize> {
        if let Some(count) = table.count_of(itemset) {
            return Ok(count);
        }
        match self.store.map(|store| store.support_count(itemset)) {
            Some(count) if count > 0 => Ok(count),
            _ => Err(MiningError::MissingSupport { itemset: itemset.to_string() }),
        }
    }
}
