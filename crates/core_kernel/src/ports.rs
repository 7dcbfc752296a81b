//! Port infrastructure
//!
//! Domain crates talk to their collaborators (the NAV feed, the position
//! store) through port traits. Adapters - an HTTP client, a database
//! repository, an in-memory double for tests - implement those traits and
//! report failures through the unified [`PortError`] type so domain code is
//! never coupled to a transport.
//!
//! ```rust,ignore
//! // In domain_holdings/src/ports.rs
//! #[async_trait]
//! pub trait NavProvider: Send + Sync {
//!     async fn latest_price(&self, scheme: SchemeCode) -> Result<Decimal, PortError>;
//! }
//! ```

use thiserror::Error;

/// Error type for port operations
///
/// All port implementations surface failures through this type, keeping
/// error handling uniform across internal and external adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// No price point exists close enough to the requested date
    #[error("Price unavailable: {message}")]
    PriceUnavailable { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// A data transformation error occurred
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortError {
    /// Creates a not-found error
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a price-unavailable error
    pub fn price_unavailable(message: impl Into<String>) -> Self {
        PortError::PriceUnavailable {
            message: message.into(),
        }
    }

    /// Creates a connection error without a source
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a connection error wrapping an underlying cause
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Whether a caller may reasonably retry the operation later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::PriceUnavailable { .. }
        )
    }
}
