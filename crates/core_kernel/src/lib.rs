//! Core Kernel - Foundational types for the portfolio back office
//!
//! This crate provides the building blocks shared by all domain modules:
//! - Strongly-typed identifiers for ledger entities
//! - The `PortError` type used at adapter boundaries

pub mod identifiers;
pub mod ports;

pub use identifiers::{DepositId, HolderId, InstallmentId, PositionId, SchemeCode};
pub use ports::PortError;
