//! Offer aggregation: one side's bounded, duplicate-free list of items

use crate::error::{TradeError, TradeResult};
use item_catalog::{CatalogItem, CatalogLookup};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Maximum number of items on one side of a trade
pub const MAX_OFFER_SLOTS: usize = 4;

/// Which catalog value an item is priced at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    #[default]
    Standard,
    Permanent,
}

impl PricingMode {
    /// Value of `item` under this mode
    pub fn value_of(self, item: &CatalogItem) -> u64 {
        match self {
            PricingMode::Standard => item.standard_value,
            PricingMode::Permanent => item.permanent_value,
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(PricingMode::Standard),
            "permanent" => Ok(PricingMode::Permanent),
            other => Err(TradeError::InvalidInput(format!(
                "mode must be \"standard\" or \"permanent\", got \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingMode::Standard => f.write_str("standard"),
            PricingMode::Permanent => f.write_str("permanent"),
        }
    }
}

/// An item placed in an offer, priced when it was added
///
/// The value is captured once; later mode changes do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferSlot {
    name: String,
    value: u64,
    mode: PricingMode,
}

impl OfferSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Mode the value was resolved under
    pub fn mode(&self) -> PricingMode {
        self.mode
    }
}

/// What to do with names the catalog cannot resolve when building from a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Leave the item out and report it
    Skip,
    /// Fail on the first unknown name
    Reject,
}

/// Result of building an offer from a list of names
#[derive(Debug, Clone, Default)]
pub struct OfferBuild {
    pub offer: TradeOffer,
    /// Names left out because the catalog did not know them
    pub skipped: Vec<String>,
}

/// One side of a trade: up to [`MAX_OFFER_SLOTS`] distinct items in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TradeOffer {
    slots: Vec<OfferSlot>,
}

impl TradeOffer {
    /// Create an empty offer
    pub fn new() -> Self {
        Self { slots: Vec::with_capacity(MAX_OFFER_SLOTS) }
    }

    /// Add an item priced under `mode`
    ///
    /// Fails with `CapacityExceeded`, `DuplicateItem` or `UnknownItem`, checked
    /// in that order. A failed add leaves the offer untouched.
    pub fn add_item<C>(
        &mut self,
        name: &str,
        mode: PricingMode,
        catalog: &C,
    ) -> TradeResult<&OfferSlot>
    where
        C: CatalogLookup + ?Sized,
    {
        if self.is_full() {
            return Err(TradeError::CapacityExceeded { capacity: MAX_OFFER_SLOTS });
        }
        if self.contains(name) {
            return Err(TradeError::DuplicateItem(name.to_string()));
        }
        let item = catalog.lookup(name).ok_or_else(|| TradeError::UnknownItem(name.to_string()))?;

        let slot = OfferSlot { name: item.name.clone(), value: mode.value_of(item), mode };
        debug!("Added {} at {} ({})", slot.name, slot.value, mode);
        self.slots.push(slot);

        Ok(&self.slots[self.slots.len() - 1])
    }

    /// Remove the item with this name; absent names are a no-op
    pub fn remove_item(&mut self, name: &str) -> Option<OfferSlot> {
        let position = self.slots.iter().position(|slot| slot.name == name)?;
        Some(self.slots.remove(position))
    }

    /// Exact sum of slot values
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|slot| slot.value).sum()
    }

    /// Clear all slots
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.name == name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= MAX_OFFER_SLOTS
    }

    pub fn slots(&self) -> &[OfferSlot] {
        &self.slots
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.name.as_str())
    }

    /// Build an offer from a list of names
    ///
    /// Capacity and duplicate rules always apply; `policy` only decides what
    /// happens to names the catalog cannot resolve.
    pub fn from_names<C, S>(
        names: &[S],
        mode: PricingMode,
        catalog: &C,
        policy: UnresolvedPolicy,
    ) -> TradeResult<OfferBuild>
    where
        C: CatalogLookup + ?Sized,
        S: AsRef<str>,
    {
        let mut build = OfferBuild::default();

        for name in names {
            let name = name.as_ref();
            match build.offer.add_item(name, mode, catalog) {
                Ok(_) => {}
                Err(TradeError::UnknownItem(unknown)) if policy == UnresolvedPolicy::Skip => {
                    warn!("Skipping unknown item '{}'", unknown);
                    build.skipped.push(unknown);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(build)
    }
}
