//! Fixed Deposit Domain
//!
//! Debt holdings with a fixed term: a principal placed at a bank compounds
//! quarterly until maturity. Maturity amount, earned interest, and the tax
//! on that interest are all derived from the deposit's own terms, so the
//! whole crate is pure arithmetic over the stored record.

pub mod deposit;

pub use deposit::FixedDeposit;
