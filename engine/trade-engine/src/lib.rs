//! # Trade Engine
//!
//! Turns two lists of catalog items into totals and a fairness verdict.
//!
//! The [`offer`] module aggregates one side of a trade under a pricing mode,
//! resolving items through [`item_catalog::CatalogLookup`]. The
//! [`classifier`] module maps two totals to a [`Verdict`] using a configurable
//! [`ThresholdModel`]. The classifier never sees the catalog and the
//! aggregator never computes verdicts.

pub mod classifier;
pub mod config;
pub mod error;
pub mod format;
pub mod offer;
pub mod session;


pub use classifier::{classify, FairnessClassifier, Verdict, VerdictLabel};
pub use config::{
    ClassifierConfig, DifferenceSign, FairBand, Normalization, ThresholdModel, ZeroBase,
};
pub use error::{TradeError, TradeResult};
pub use format::format_value;
pub use offer::{OfferBuild, OfferSlot, PricingMode, TradeOffer, UnresolvedPolicy, MAX_OFFER_SLOTS};
pub use session::{Side, TradeEvaluation, TradeSession};

/// Current version of the trade engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
