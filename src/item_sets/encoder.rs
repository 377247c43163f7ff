//! Label ↔ surrogate mapping for raw transaction rows.
//!
//! Surrogates are assigned in ascending label order, so the canonical
//! order of an [`ItemSet`] is also the alphabetical order of its labels.

use rustc_hash::FxHashMap;

use crate::error::{to_u32, MiningError, MiningResult};

use super::itemset::{Item, ItemSet};

#[derive(Debug, Clone, Default)]
pub struct ItemEncoder {
    labels: Vec<String>,
    ids: FxHashMap<String, Item>,
}

impl ItemEncoder {
    /// Learns the vocabulary of `rows`. Blank cells are ignored. More
    /// distinct labels than `u32` can number is an error.
    pub fn fit<R, S>(rows: &[R]) -> MiningResult<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter())
            .filter_map(|cell| normalize(cell.as_ref()))
            .map(str::to_owned)
            .collect();
        labels.sort_unstable();
        labels.dedup();

        let ids = labels
            .iter()
            .enumerate()
            .map(|(id, label)| Ok((label.clone(), to_u32(id, "item labels")?)))
            .collect::<MiningResult<_>>()?;
        Ok(Self { labels, ids })
    }

    /// Maps each row to an itemset; repeated labels in a row collapse.
    pub fn encode<R, S>(&self, rows: &[R]) -> MiningResult<Vec<ItemSet>>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        rows.iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .filter_map(|cell| normalize(cell.as_ref()))
                    .map(|label| self.id(label))
                    .collect::<MiningResult<ItemSet>>()
            })
            .collect()
    }

    pub fn id(&self, label: &str) -> MiningResult<Item> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| MiningError::UnknownItem(label.to_owned()))
    }

    pub fn label(&self, item: Item) -> Option<&str> {
        self.labels.get(item as usize).map(String::as_str)
    }

    /// Labels of `itemset` in canonical order. Unknown surrogates are skipped.
    pub fn decode(&self, itemset: &ItemSet) -> Vec<&str> {
        itemset.items().iter().filter_map(|item| self.label(*item)).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn normalize(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogates_follow_label_order() {
        let rows = vec![vec!["milk", "bread"], vec!["butter", " milk "]];
        let encoder = ItemEncoder::fit(&rows).unwrap();
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.id("bread").unwrap(), 0);
        assert_eq!(encoder.id("butter").unwrap(), 1);
        assert_eq!(encoder.id("milk").unwrap(), 2);
    }

    #[test]
    fn encode_collapses_duplicates_and_blanks() {
        let rows = vec![vec!["milk", "milk", "", "bread"]];
        let encoder = ItemEncoder::fit(&rows).unwrap();
        let encoded = encoder.encode(&rows).unwrap();
        assert_eq!(encoded, vec![ItemSet::new([0, 1])]);
        assert_eq!(encoder.decode(&encoded[0]), vec!["bread", "milk"]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let encoder = ItemEncoder::fit(&[vec!["a"]]).unwrap();
        let err = encoder.encode(&[vec!["b"]]).unwrap_err();
        assert_eq!(err, MiningError::UnknownItem("b".into()));
    }
}
