//! Error types for the TradeGateway

use item_catalog::CatalogError;
use thiserror::Error;
use trade_engine::TradeError;

/// Errors that can occur in the TradeGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Whether the caller sent something we refuse, rather than us failing
    pub fn is_client_error(&self) -> bool {
        match self {
            GatewayError::Validation(_) => true,
            GatewayError::Trade(e) => e.is_user_error() || matches!(e, TradeError::InvalidInput(_)),
            GatewayError::Catalog(CatalogError::NotFound(_)) => true,
            _ => false,
        }
    }
}

/// Result type for TradeGateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
