//! Test Utilities
//!
//! Builders for ledger fixtures and in-memory implementations of the
//! holdings ports, so service-level tests run without a database or the
//! live NAV feed.

pub mod adapters;
pub mod builders;
pub mod fixtures;

pub use adapters::{FixedNavProvider, InMemoryPositionStore};
pub use builders::{LumpSumPositionBuilder, SipPositionBuilder};
