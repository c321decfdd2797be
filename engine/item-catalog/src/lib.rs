//! Item Catalog - Read-only lookup of tradeable item attributes
//!
//! This crate owns the static item table: the two valuation figures
//! (standard and permanent), demand and rarity. Consumers resolve items by
//! exact name through the [`CatalogLookup`] trait.

pub mod catalog;
pub mod types;

pub use catalog::{CatalogLookup, ItemCatalog};
pub use types::{CatalogData, CatalogError, CatalogItem, ItemKind, Rarity, Trend, MAX_ITEM_VALUE};
