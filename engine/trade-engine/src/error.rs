//! Error types for the trade engine

use thiserror::Error;

/// Errors raised while building offers or configuring the classifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("Offer is full: at most {capacity} items per side")]
    CapacityExceeded { capacity: usize },

    #[error("Item '{0}' is already in this offer")]
    DuplicateItem(String),

    #[error("Item '{0}' not found in catalog")]
    UnknownItem(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TradeError {
    /// Recoverable errors caused by what the user picked, as opposed to caller bugs
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TradeError::CapacityExceeded { .. }
                | TradeError::DuplicateItem(_)
                | TradeError::UnknownItem(_)
        )
    }
}

/// Result type for trade engine operations
pub type TradeResult<T> = Result<T, TradeError>;
