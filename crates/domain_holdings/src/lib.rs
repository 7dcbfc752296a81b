//! Mutual Fund Holdings Domain
//!
//! This crate implements the valuation and tax core of the portfolio back
//! office: append-only position ledgers for lump-sum and SIP investments,
//! NAV-based valuation, FIFO redemption across SIP tranches, and
//! capital-gains tax assessment per redeemed tranche.
//!
//! # Key Concepts
//!
//! - **Position**: one investment instrument held by one holder
//! - **Installment**: one scheduled SIP contribution (a tranche)
//! - **Redemption**: an immutable record of a partial or full sale
//! - **NAV**: per-unit price of the scheme on a given date, supplied by an
//!   external feed through the [`ports::NavProvider`] port
//!
//! # Unit Precision
//!
//! Units are stored with 8 decimal places, matching the registrar feed:
//! - Contribution: 10,000
//! - NAV: 54.2871
//! - Units: 184.20576479

pub mod error;
pub mod nav;
pub mod ports;
pub mod position;
pub mod redemption;
pub mod schedule;
pub mod services;
pub mod tax;
pub mod valuation;

pub use error::HoldingsError;
pub use nav::{NavHistory, NavPoint, NAV_TOLERANCE_DAYS};
pub use position::{
    Holding, Installment, InvestmentType, LumpSumHolding, Position, SipHolding, SipStatus,
};
pub use redemption::{redeem, Redemption, TaxSummary, TrancheRedemption};
pub use services::{
    HoldingsService, NewLumpSumPosition, NewSipPosition, RedemptionOutcome, ReturnKind,
    ReturnMetric, SweepOutcome,
};
pub use tax::{assess, classify_regime, TaxAssessment, TaxRegime, TaxType};
pub use valuation::{value_position, Valuation};

use rust_decimal::Decimal;

/// Standard unit precision (8 decimal places)
pub const UNIT_PRECISION: u32 = 8;

/// Currency precision for monetary values
pub const CURRENCY_PRECISION: u32 = 2;

/// Rounds a value to standard unit precision
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp(UNIT_PRECISION)
}

/// Calculates units acquired for an amount at a given NAV
///
/// Returns zero units for a zero NAV rather than dividing by it; the feed
/// adapter treats a zero price as unavailable before it ever gets here.
pub fn units_for_amount(amount: Decimal, nav: Decimal) -> Decimal {
    if nav.is_zero() {
        return Decimal::ZERO;
    }
    round_units(amount / nav)
}

/// Calculates the monetary value of units at a given NAV
pub fn value_of_units(units: Decimal, nav: Decimal) -> Decimal {
    (units * nav).round_dp(CURRENCY_PRECISION)
}
