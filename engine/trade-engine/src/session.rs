//! A request-scoped pair of offers

use crate::classifier::{FairnessClassifier, Verdict};
use crate::error::TradeResult;
use crate::offer::{OfferSlot, PricingMode, TradeOffer};
use item_catalog::CatalogLookup;
use serde::Serialize;

/// Side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yours,
    Theirs,
}

/// Totals and verdict for one evaluation of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvaluation {
    pub your_total: u64,
    pub their_total: u64,
    pub verdict: Verdict,
}

/// Both offers of a trade plus the mode new items are priced at
///
/// Changing the mode affects only items added afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeSession {
    yours: TradeOffer,
    theirs: TradeOffer,
    mode: PricingMode,
}

impl TradeSession {
    pub fn new(mode: PricingMode) -> Self {
        Self { yours: TradeOffer::new(), theirs: TradeOffer::new(), mode }
    }

    /// Assemble a session from offers built elsewhere
    pub fn from_offers(yours: TradeOffer, theirs: TradeOffer, mode: PricingMode) -> Self {
        Self { yours, theirs, mode }
    }

    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    /// Switch the mode for subsequent adds; existing slots keep their values
    pub fn set_mode(&mut self, mode: PricingMode) {
        self.mode = mode;
    }

    pub fn offer(&self, side: Side) -> &TradeOffer {
        match side {
            Side::Yours => &self.yours,
            Side::Theirs => &self.theirs,
        }
    }

    fn offer_mut(&mut self, side: Side) -> &mut TradeOffer {
        match side {
            Side::Yours => &mut self.yours,
            Side::Theirs => &mut self.theirs,
        }
    }

    pub fn add_item<C>(&mut self, side: Side, name: &str, catalog: &C) -> TradeResult<&OfferSlot>
    where
        C: CatalogLookup + ?Sized,
    {
        let mode = self.mode;
        self.offer_mut(side).add_item(name, mode, catalog)
    }

    pub fn remove_item(&mut self, side: Side, name: &str) -> Option<OfferSlot> {
        self.offer_mut(side).remove_item(name)
    }

    /// Clear both sides; the mode is kept
    pub fn reset(&mut self) {
        self.yours.reset();
        self.theirs.reset();
    }

    /// `(your_total, their_total)`
    pub fn totals(&self) -> (u64, u64) {
        (self.yours.total(), self.theirs.total())
    }

    pub fn evaluate(&self, classifier: &FairnessClassifier) -> TradeEvaluation {
        let (your_total, their_total) = self.totals();
        let verdict = classifier.classify(your_total, their_total);
        TradeEvaluation { your_total, their_total, verdict }
    }
}
