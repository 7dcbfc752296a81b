//! Compound Annual Growth Rate (CAGR)

use chrono::NaiveDate;

/// Computes CAGR for a single investment held between two dates
///
/// `CAGR = (end_value / start_value)^(1 / years) - 1` with
/// `years = calendar days / 365`.
///
/// # Arguments
///
/// * `start_value` - The invested amount
/// * `end_value` - The value at `end_date`
/// * `start_date` - When the investment was made
/// * `end_date` - The valuation date
///
/// # Returns
///
/// The annualized growth rate as a fraction (`0.10` = 10%). Returns `0.0`
/// when the growth rate is undefined: non-positive start value or a
/// non-positive holding period.
pub fn cagr(start_value: f64, end_value: f64, start_date: NaiveDate, end_date: NaiveDate) -> f64 {
    if start_value <= 0.0 {
        return 0.0;
    }

    let years = (end_date - start_date).num_days() as f64 / 365.0;
    if years <= 0.0 {
        return 0.0;
    }

    (end_value / start_value).powf(1.0 / years) - 1.0
}
