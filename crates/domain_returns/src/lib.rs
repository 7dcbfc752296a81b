//! Return Calculators
//!
//! Money-weighted and time-weighted return measures for portfolio reporting:
//!
//! - **XIRR**: the annualized discount rate at which the net present value of
//!   an irregular cash-flow series is zero, solved by Newton-Raphson
//!   iteration. Non-convergence is a reporting condition, not an error: the
//!   solver returns `Ok(None)` and the caller decides how to present it.
//! - **CAGR**: compound annual growth rate for a single inflow/outflow pair.
//!
//! Sign convention: negative amounts are investments (outflows), positive
//! amounts are proceeds or the current value of the holding.

pub mod cagr;
pub mod error;
pub mod xirr;

pub use cagr::cagr;
pub use error::ReturnsError;
pub use xirr::{xirr, CashFlow};
