//! NAV Feed Adapter
//!
//! HTTP implementation of the holdings domain's `NavProvider` port against
//! an AMFI-style registrar feed: `GET {base}/mf/{scheme_code}` returns the
//! scheme's full price history, newest point first, with `dd-mm-yyyy` dates
//! and string-encoded prices.

pub mod client;
pub mod config;
pub mod error;

pub use client::NavFeedClient;
pub use config::NavFeedConfig;
pub use error::NavFeedError;
