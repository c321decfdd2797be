use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest value a catalog entry may carry for either pricing field.
///
/// Keeps the sum of a full offer exact in both `u64` and `i64`.
pub const MAX_ITEM_VALUE: u64 = 1_000_000_000_000_000;

/// Rarity tier of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Mythical,
}

/// Item family as shown in the catalog browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Beast,
    Logia,
    Natural,
    Elemental,
}

/// Community sentiment about an item's current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Overpaid,
    Dropping,
    Rising,
    Stable,
    Soon,
    Underpaid,
}

/// A tradeable item as listed in the catalog
///
/// `permanent_value >= standard_value` usually holds, but nothing relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique, case-sensitive key (e.g., "West Dragon")
    pub name: String,

    /// Value of the regular (consumable) form
    pub standard_value: u64,

    /// Value of the permanent form
    pub permanent_value: u64,

    /// In-game shop price
    #[serde(default)]
    pub price: u64,

    pub rarity: Rarity,

    /// Demand rating from 1 to 10
    pub demand: u8,

    pub trend: Trend,

    pub kind: ItemKind,

    /// Whether the item is in the current shop rotation
    #[serde(default)]
    pub in_stock: bool,
}

impl CatalogItem {
    /// Create a new catalog item with neutral informational fields
    pub fn new(name: impl Into<String>, standard_value: u64, permanent_value: u64) -> Self {
        Self {
            name: name.into(),
            standard_value,
            permanent_value,
            price: 0,
            rarity: Rarity::Common,
            demand: 1,
            trend: Trend::Stable,
            kind: ItemKind::Natural,
            in_stock: false,
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_demand(mut self, demand: u8) -> Self {
        self.demand = demand;
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Check the entry against the catalog's load rules
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !(1..=10).contains(&self.demand) {
            return Err(CatalogError::InvalidDemand {
                name: self.name.clone(),
                demand: self.demand,
            });
        }
        let largest = self.standard_value.max(self.permanent_value);
        if largest > MAX_ITEM_VALUE {
            return Err(CatalogError::ValueOutOfRange { name: self.name.clone(), value: largest });
        }
        Ok(())
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
            Rarity::Mythical => "Mythical",
        };
        f.write_str(label)
    }
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub items: Vec<CatalogItem>,
}

/// Errors that can occur while loading or querying the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog entry has an empty name")]
    EmptyName,

    #[error("Item '{0}' appears more than once in the catalog")]
    DuplicateName(String),

    #[error("Item '{name}' has demand {demand}, expected 1-10")]
    InvalidDemand { name: String, demand: u8 },

    #[error("Item '{name}' has value {value}, above the catalog limit")]
    ValueOutOfRange { name: String, value: u64 },

    #[error("Item '{0}' not found in catalog")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_inverted_values() {
        // permanent below standard is unusual but legal
        let item = CatalogItem::new("Odd", 500, 100);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        assert!(matches!(CatalogItem::new("  ", 1, 1).validate(), Err(CatalogError::EmptyName)));
        assert!(matches!(
            CatalogItem::new("Zero", 1, 1).with_demand(0).validate(),
            Err(CatalogError::InvalidDemand { demand: 0, .. })
        ));
        assert!(matches!(
            CatalogItem::new("Huge", 1, MAX_ITEM_VALUE + 1).validate(),
            Err(CatalogError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_item_json_shape() {
        let json = r#"{
            "name": "Kitsune",
            "standard_value": 215000000,
            "permanent_value": 1800000000,
            "rarity": "Mythical",
            "demand": 10,
            "trend": "Overpaid",
            "kind": "Beast"
        }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.standard_value, 215_000_000);
        assert_eq!(item.price, 0);
        assert!(!item.in_stock);
        assert_eq!(item.rarity.to_string(), "Mythical");
    }
}
