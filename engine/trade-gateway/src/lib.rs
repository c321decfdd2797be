//! TradeGateway - REST API for trade valuation
//!
//! This module provides the external HTTP interface: trade calculation,
//! read-only catalog lookups and health checks. Requests are validated once
//! at this boundary before reaching the trade engine.

pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod rest_api;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};

/// Version of the TradeGateway API
pub const VERSION: &str = "0.1.0";
