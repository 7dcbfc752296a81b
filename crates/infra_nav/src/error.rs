//! NAV feed adapter errors

use core_kernel::{PortError, SchemeCode};
use thiserror::Error;

/// Errors raised by the feed client
#[derive(Debug, Error)]
pub enum NavFeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned no price data for scheme {0}")]
    EmptyFeed(SchemeCode),

    #[error("Malformed feed record: {0}")]
    Parse(String),
}

impl From<NavFeedError> for PortError {
    fn from(err: NavFeedError) -> Self {
        match err {
            NavFeedError::Http(source) => {
                PortError::connection_with_source("NAV feed request failed", source)
            }
            NavFeedError::EmptyFeed(scheme) => {
                PortError::price_unavailable(format!("no price data for scheme {scheme}"))
            }
            NavFeedError::Parse(message) => PortError::transformation(message),
        }
    }
}
