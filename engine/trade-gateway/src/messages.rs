//! Request and response types for the TradeGateway REST API

use crate::error::{GatewayError, GatewayResult};
use item_catalog::{CatalogItem, ItemKind, Rarity, Trend};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trade_engine::{format_value, PricingMode, VerdictLabel, MAX_OFFER_SLOTS};

/// Trade calculation request body, as sent by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateTradeRequest {
    /// Item names you give
    pub your_items: Vec<String>,

    /// Item names you receive
    pub their_items: Vec<String>,

    /// "standard" or "permanent"
    pub mode: String,
}

/// A calculation request that passed boundary validation
///
/// Only [`CalculateTradeRequest::validate`] builds one, so holders can rely on
/// both lists being short and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTradeRequest {
    your_items: Vec<String>,
    their_items: Vec<String>,
    mode: PricingMode,
}

impl ValidatedTradeRequest {
    pub fn your_items(&self) -> &[String] {
        &self.your_items
    }

    pub fn their_items(&self) -> &[String] {
        &self.their_items
    }

    pub fn mode(&self) -> PricingMode {
        self.mode
    }
}

impl CalculateTradeRequest {
    /// Check list sizes, duplicates and mode once, at the boundary
    pub fn validate(self) -> GatewayResult<ValidatedTradeRequest> {
        check_items("yourItems", &self.your_items)?;
        check_items("theirItems", &self.their_items)?;

        let mode = self
            .mode
            .parse::<PricingMode>()
            .map_err(|e| GatewayError::Validation(e.to_string()))?;

        Ok(ValidatedTradeRequest {
            your_items: self.your_items,
            their_items: self.their_items,
            mode,
        })
    }
}

fn check_items(field: &str, items: &[String]) -> GatewayResult<()> {
    if items.len() > MAX_OFFER_SLOTS {
        return Err(GatewayError::Validation(format!(
            "{field} has {} items, at most {MAX_OFFER_SLOTS} allowed",
            items.len()
        )));
    }

    let mut seen = HashSet::with_capacity(items.len());
    for name in items {
        if !seen.insert(name.as_str()) {
            return Err(GatewayError::Validation(format!("{field} lists '{name}' more than once")));
        }
    }
    Ok(())
}

/// Names left out of the totals because the catalog did not know them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItems {
    pub yours: Vec<String>,
    pub theirs: Vec<String>,
}

/// Trade calculation response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateTradeResponse {
    pub your_total: u64,
    pub their_total: u64,
    pub difference: i64,
    pub percentage: f64,
    pub verdict: VerdictLabel,
    pub your_share: f64,
    pub their_share: f64,
    pub mode: PricingMode,
    pub skipped: SkippedItems,
}

/// Catalog entry as returned by the item endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub name: String,
    pub standard_value: u64,
    pub permanent_value: u64,
    pub standard_display: String,
    pub permanent_display: String,
    pub price: u64,
    pub rarity: Rarity,
    pub demand: u8,
    pub trend: Trend,
    pub kind: ItemKind,
    pub in_stock: bool,
}

impl From<&CatalogItem> for ItemResponse {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            standard_value: item.standard_value,
            permanent_value: item.permanent_value,
            standard_display: format_value(item.standard_value),
            permanent_display: format_value(item.permanent_value),
            price: item.price,
            rarity: item.rarity,
            demand: item.demand,
            trend: item.trend,
            kind: item.kind,
            in_stock: item.in_stock,
        }
    }
}

/// Items currently in the shop rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub in_stock: Vec<ItemResponse>,
}

/// Query parameters for the item listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsQuery {
    /// Case-insensitive name filter
    pub q: Option<String>,

    /// Maximum number of items returned
    pub limit: Option<usize>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail { code: code.to_string(), message: message.into(), details: None },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}
