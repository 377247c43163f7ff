//! Errors for itemset mining and rule generation.
//! One enum for the whole crate, `thiserror` only.

/// Errors that can occur while mining itemsets or deriving rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MiningError {
    #[error("no transactions supplied")]
    EmptyInput,

    #[error("{name} out of range: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no frequent itemset of size 2 or more, rules cannot be formed")]
    EmptyFrequentSet,

    #[error("unknown item label: {0}")]
    UnknownItem(String),

    #[error("support of itemset {itemset} is not known")]
    MissingSupport { itemset: String },

    #[error("mining cancelled at level {level}")]
    Cancelled { level: usize },

    #[error("failed to parse configuration: {0}")]
    Config(String),

    #[error("too many {what}: ids are limited to u32")]
    CapacityExceeded { what: &'static str },
}

impl MiningError {
    /// Whether the caller should treat this as a failure rather than an
    /// empty result. Only `EmptyFrequentSet` is non-fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyFrequentSet)
    }
}

impl From<toml::de::Error> for MiningError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type MiningResult<T> = Result<T, MiningError>;

/// Checks that a probability-like threshold lies in (0, 1].
pub(crate) fn check_unit_threshold(name: &'static str, value: f64) -> MiningResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(MiningError::InvalidThreshold { name, value })
    }
}

/// Narrows a position to a `u32` surrogate. Transaction ids and item
/// ids are stored as `u32`.
pub(crate) fn to_u32(index: usize, what: &'static str) -> MiningResult<u32> {
    u32::try_from(index).map_err(|_| MiningError::CapacityExceeded { what })
}
