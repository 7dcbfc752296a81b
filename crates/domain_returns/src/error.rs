//! Return calculator errors

use thiserror::Error;

/// Errors that can occur when computing returns
#[derive(Debug, Error)]
pub enum ReturnsError {
    #[error("Invalid cashflow set: {0}")]
    InvalidCashflowSet(String),
}
