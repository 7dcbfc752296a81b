//! Extended Internal Rate of Return (XIRR)
//!
//! Solves for the rate `r` such that `sum(amount_i / (1+r)^(days_i/365)) = 0`
//! over an irregular series of dated cash flows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReturnsError;

/// A dated cash flow
///
/// Negative amounts are investments, positive amounts are proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Initial guess for the rate (10%)
const INITIAL_GUESS: f64 = 0.10;
/// Convergence tolerance on the rate between iterations
const TOLERANCE: f64 = 1e-6;
/// Iteration cap
const MAX_ITERATIONS: u32 = 100;
/// Below this derivative magnitude the iteration has stalled
const DERIVATIVE_FLOOR: f64 = 1e-10;
/// Rates beyond this magnitude are meaningless for reporting
const MAX_SANE_RATE: f64 = 1e6;

/// Computes XIRR for a series of cash flows via Newton-Raphson iteration
///
/// # Arguments
///
/// * `cash_flows` - The dated cash flows; at least two entries with at least
///   one strictly positive and one strictly negative amount
///
/// # Returns
///
/// `Ok(Some(rate))` on convergence, e.g. `0.15` for 15% annualized.
/// `Ok(None)` when the iteration does not converge or lands on an
/// implausible rate - callers report the figure as unavailable rather than
/// failing the whole report.
///
/// # Errors
///
/// Returns [`ReturnsError::InvalidCashflowSet`] when the series is too short
/// or all amounts share the same sign.
pub fn xirr(cash_flows: &[CashFlow]) -> Result<Option<f64>, ReturnsError> {
    if cash_flows.len() < 2 {
        return Err(ReturnsError::InvalidCashflowSet(
            "at least 2 cash flows are required".to_string(),
        ));
    }

    let has_positive = cash_flows.iter().any(|cf| cf.amount > 0.0);
    let has_negative = cash_flows.iter().any(|cf| cf.amount < 0.0);
    if !has_positive || !has_negative {
        return Err(ReturnsError::InvalidCashflowSet(
            "cash flows must contain both positive and negative amounts".to_string(),
        ));
    }

    // Day offsets from the earliest date keep the exponents small
    let first_date = cash_flows
        .iter()
        .map(|cf| cf.date)
        .min()
        .ok_or_else(|| ReturnsError::InvalidCashflowSet("empty cash flow set".to_string()))?;
    let day_numbers: Vec<f64> = cash_flows
        .iter()
        .map(|cf| (cf.date - first_date).num_days() as f64)
        .collect();

    let mut rate = INITIAL_GUESS;
    let mut last_rate = rate + 1.0;
    let mut iteration = 0;

    while (rate - last_rate).abs() > TOLERANCE && iteration < MAX_ITERATIONS {
        last_rate = rate;

        let mut npv = 0.0;
        let mut npv_derivative = 0.0;
        for (cf, days) in cash_flows.iter().zip(&day_numbers) {
            let exponent = days / 365.0;
            let denominator = (1.0 + rate).powf(exponent);

            npv += cf.amount / denominator;
            npv_derivative -= (cf.amount * exponent) / (denominator * (1.0 + rate));
        }

        // Stalled: treat as non-convergence unless tolerance was already met
        if npv_derivative.abs() < DERIVATIVE_FLOOR {
            break;
        }

        rate -= npv / npv_derivative;
        iteration += 1;
    }

    if iteration >= MAX_ITERATIONS || !rate.is_finite() || rate.abs() > MAX_SANE_RATE {
        return Ok(None);
    }
    if (rate - last_rate).abs() > TOLERANCE {
        // Exited on the stall guard before reaching tolerance
        return Ok(None);
    }

    Ok(Some(rate))
}
