//! Holdings domain errors

use core_kernel::PortError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the holdings domain
#[derive(Debug, Error)]
pub enum HoldingsError {
    /// A request field is out of range. User-correctable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The redemption request exceeds the units still available.
    /// User-correctable; the ledger is left untouched.
    #[error("Insufficient units: requested {requested}, available {available}")]
    InsufficientUnits {
        requested: Decimal,
        available: Decimal,
    },

    /// The NAV feed could not supply a price within tolerance.
    /// The caller may retry later.
    #[error("Price unavailable: {0}")]
    PriceUnavailable(String),

    /// A ledger invariant has been violated. Fatal: indicates data
    /// corruption and must never be silently repaired.
    #[error("Invalid ledger state: {0}")]
    InvalidState(String),

    #[error("Position not found: {0}")]
    PositionNotFound(String),

    /// A failure at an adapter boundary other than price availability
    #[error("Port error: {0}")]
    Port(#[source] PortError),
}

impl HoldingsError {
    pub fn validation(message: impl Into<String>) -> Self {
        HoldingsError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        HoldingsError::InvalidState(message.into())
    }
}

impl From<PortError> for HoldingsError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::PriceUnavailable { message } => HoldingsError::PriceUnavailable(message),
            PortError::NotFound { entity_type, id } if entity_type == "Position" => {
                HoldingsError::PositionNotFound(id)
            }
            other => HoldingsError::Port(other),
        }
    }
}
