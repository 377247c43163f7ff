//! Mining parameters.

use serde::{Deserialize, Serialize};

use crate::error::{check_unit_threshold, MiningError, MiningResult};
use crate::item_sets::Metric;

/// Thresholds and options for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum itemset support. Default: 0.05.
    pub min_support: Option<f64>,
    /// Rule metric to filter on. Default: confidence.
    pub metric: Option<Metric>,
    /// Minimum value of `metric` for a rule to be kept. Default: 0.5.
    pub min_threshold: Option<f64>,
    /// Largest itemset size to mine. Default: unbounded.
    pub max_len: Option<usize>,
    /// Use the rayon pool for counting and rule generation. Default: false.
    pub parallel: Option<bool>,
}

impl MiningConfig {
    pub fn from_toml_str(input: &str) -> MiningResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn effective_min_support(&self) -> f64 {
        self.min_support.unwrap_or(0.05)
    }

    pub fn effective_metric(&self) -> Metric {
        self.metric.unwrap_or_default()
    }

    pub fn effective_min_threshold(&self) -> f64 {
        self.min_threshold.unwrap_or(0.5)
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(false)
    }

    /// Checks every parameter before any work starts.
    pub fn validate(&self) -> MiningResult<()> {
        check_unit_threshold("min_support", self.effective_min_support())?;
        self.effective_metric().validate_threshold(self.effective_min_threshold())?;
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidConfig("max_len must be at least 1".into()));
        }
        Ok(())
    }
}
