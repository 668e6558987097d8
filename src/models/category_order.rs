//! Staff category ordering.
//!
//! A [`CategoryOrder`] maps each staff category label to a dense 1-based
//! rank. The constructors are the only way to build one, so every instance
//! holds ranks `1..=N` with no gaps or duplicates.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dense, deterministic category → rank mapping.
///
/// # Example
///
/// ```
/// use allocation_engine::models::CategoryOrder;
/// use rust_decimal::Decimal;
///
/// let order = CategoryOrder::from_weighted(vec![
///     ("Support".to_string(), Decimal::from(20)),
///     ("Academic".to_string(), Decimal::from(5)),
///     ("Admin".to_string(), Decimal::from(20)),
/// ]);
/// assert_eq!(order.rank("Academic"), Some(1));
/// assert_eq!(order.rank("Admin"), Some(2));
/// assert_eq!(order.rank("Support"), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOrder {
    ranks: BTreeMap<String, u32>,
}

impl CategoryOrder {
    /// Builds an order from (category, weight) pairs.
    ///
    /// A category listed twice keeps its last weight. Categories are sorted
    /// by weight, then label, and re-ranked 1..N in that sequence, so gaps
    /// and ties in the weights never leak into the ranks.
    pub fn from_weighted<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let latest: BTreeMap<String, Decimal> = pairs.into_iter().collect();

        let mut sorted: Vec<(String, Decimal)> = latest.into_iter().collect();
        sorted.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let ranks = sorted
            .into_iter()
            .zip(1u32..)
            .map(|((label, _), rank)| (label, rank))
            .collect();
        Self { ranks }
    }

    /// Builds an order from labels alone, ranked lexicographically.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_weighted(labels.into_iter().map(|label| (label.into(), Decimal::ZERO)))
    }

    /// Returns the rank of a category, if known.
    pub fn rank(&self, category: &str) -> Option<u32> {
        self.ranks.get(category).copied()
    }

    /// Returns true if the category has a rank.
    pub fn contains(&self, category: &str) -> bool {
        self.ranks.contains_key(category)
    }

    /// Number of ranked categories.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns true if no category is ranked.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Category labels in rank order.
    pub fn labels_in_order(&self) -> Vec<&str> {
        let mut labels: Vec<(&str, u32)> = self
            .ranks
            .iter()
            .map(|(label, rank)| (label.as_str(), *rank))
            .collect();
        labels.sort_by_key(|(_, rank)| *rank);
        labels.into_iter().map(|(label, _)| label).collect()
    }
}
