//! Pattern mining tools.
//!
//! - [`item_sets`]: frequent itemsets (Apriori) and association rules
//! - [`market_basket`]: labelled rows in, labelled itemsets and rules out

pub mod cancellation;
pub mod config;
pub mod error;
pub mod item_sets;
pub mod market_basket;

pub use config::MiningConfig;
pub use error::{MiningError, MiningResult};
pub use market_basket::{AnalysisReport, LabelledItemSet, LabelledRule, MarketBasket};
