//! Common fixture values

use chrono::NaiveDate;

/// Shorthand date constructor for tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// Scheme labels hitting each tax regime
pub mod labels {
    pub const EQUITY: &str = "Large Cap Equity Fund";
    pub const DEBT: &str = "Corporate Debt Fund";
    pub const HYBRID: &str = "Balanced Hybrid Fund";
    pub const UNCLASSIFIED: &str = "Gold Fund of Funds";
}
