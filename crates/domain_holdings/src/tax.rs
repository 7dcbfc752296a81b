//! Capital-gains tax engine
//!
//! Pure functions: classify the instrument into a tax regime from its label,
//! then assess one redeemed tranche under that regime.
//!
//! Regime rules are an ordered substring list evaluated first-match-wins, so
//! a label matching several substrings ("Hybrid Debt Advantage") classifies
//! deterministically: equity-like rules are checked before the debt rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::CURRENCY_PRECISION;

/// Tax treatment of a redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxType {
    LongTermCapitalGains,
    ShortTermCapitalGains,
    /// The instrument could not be classified; no tax is assessed
    Unknown,
}

/// Tax regime an instrument falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Equity, ELSS, and hybrid schemes
    EquityLike,
    /// Debt schemes (post-reform slab treatment)
    DebtLike,
    Unknown,
}

/// Holding period above which equity-like gains become long-term
pub const LONG_TERM_THRESHOLD_DAYS: i64 = 365;

/// Per-redemption exemption applied to long-term equity gains
pub const EQUITY_LTCG_EXEMPTION: Decimal = dec!(100000);

const EQUITY_LTCG_RATE: Decimal = dec!(0.10);
const EQUITY_STCG_RATE: Decimal = dec!(0.15);
const DEBT_RATE: Decimal = dec!(0.30);

/// Ordered classification rules; first match wins
const REGIME_RULES: &[(&str, TaxRegime)] = &[
    ("equity", TaxRegime::EquityLike),
    ("elss", TaxRegime::EquityLike),
    ("hybrid", TaxRegime::EquityLike),
    ("debt", TaxRegime::DebtLike),
];

/// Classifies an instrument label into a tax regime
///
/// Matching is a case-insensitive substring test against [`REGIME_RULES`]
/// in order. Unmatched labels classify as [`TaxRegime::Unknown`].
pub fn classify_regime(label: &str) -> TaxRegime {
    let label = label.to_lowercase();
    for (needle, regime) in REGIME_RULES {
        if label.contains(needle) {
            return *regime;
        }
    }
    TaxRegime::Unknown
}

/// Outcome of assessing one redeemed tranche
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub tax_type: TaxType,
    /// Tax owed; negative when a loss flows through a flat-rate branch
    pub tax: Decimal,
    /// Realized gain, signed
    pub gain: Decimal,
}

/// Assesses capital-gains tax for one redeemed tranche
///
/// # Arguments
///
/// * `regime` - Regime from [`classify_regime`]
/// * `acquisition_date` / `disposal_date` - Tranche purchase and sale dates
/// * `units` - Units sold from this tranche
/// * `acquisition_nav` / `disposal_nav` - Per-unit prices at purchase and sale
///
/// Losses are not floored: a negative gain produces a negative tax figure in
/// the flat-rate branches, faithful to the upstream policy. Only the
/// long-term equity branch applies the 100,000 exemption floor.
pub fn assess(
    regime: TaxRegime,
    acquisition_date: NaiveDate,
    disposal_date: NaiveDate,
    units: Decimal,
    acquisition_nav: Decimal,
    disposal_nav: Decimal,
) -> TaxAssessment {
    let holding_days = (disposal_date - acquisition_date).num_days();
    let gain = (disposal_nav - acquisition_nav) * units;

    let (tax_type, tax) = match regime {
        TaxRegime::EquityLike => {
            if holding_days > LONG_TERM_THRESHOLD_DAYS {
                let taxable = (gain - EQUITY_LTCG_EXEMPTION).max(Decimal::ZERO);
                (TaxType::LongTermCapitalGains, taxable * EQUITY_LTCG_RATE)
            } else {
                (TaxType::ShortTermCapitalGains, gain * EQUITY_STCG_RATE)
            }
        }
        TaxRegime::DebtLike => (TaxType::ShortTermCapitalGains, gain * DEBT_RATE),
        TaxRegime::Unknown => (TaxType::Unknown, Decimal::ZERO),
    };

    TaxAssessment {
        tax_type,
        tax: tax.round_dp(CURRENCY_PRECISION),
        gain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_regime_classification() {
        assert_eq!(
            classify_regime("Large Cap Equity Fund"),
            TaxRegime::EquityLike
        );
        assert_eq!(classify_regime("Corporate Debt Fund"), TaxRegime::DebtLike);
        assert_eq!(
            classify_regime("Balanced Hybrid Fund"),
            TaxRegime::EquityLike
        );
        assert_eq!(classify_regime("Tax Saver ELSS"), TaxRegime::EquityLike);
        assert_eq!(classify_regime("Gold Fund of Funds"), TaxRegime::Unknown);
    }

    #[test]
    fn test_equity_rules_checked_before_debt() {
        // Matches both "hybrid" and "debt"; the ordered rules pick equity-like
        assert_eq!(
            classify_regime("Hybrid Debt Advantage Fund"),
            TaxRegime::EquityLike
        );
    }

    #[test]
    fn test_equity_short_term() {
        let assessment = assess(
            TaxRegime::EquityLike,
            date(2023, 1, 1),
            date(2023, 12, 1),
            dec!(100),
            dec!(50),
            dec!(60),
        );
        assert_eq!(assessment.tax_type, TaxType::ShortTermCapitalGains);
        assert_eq!(assessment.gain, dec!(1000));
        assert_eq!(assessment.tax, dec!(150.00));
    }

    #[test]
    fn test_equity_long_term_above_exemption() {
        // 101 units x 2000 gain/unit = 202,000; taxable 102,000 at 10%
        let assessment = assess(
            TaxRegime::EquityLike,
            date(2020, 1, 1),
            date(2023, 1, 1),
            dec!(101),
            dec!(1000),
            dec!(3000),
        );
        assert_eq!(assessment.tax_type, TaxType::LongTermCapitalGains);
        assert_eq!(assessment.tax, dec!(10200.00));
    }

    #[test]
    fn test_equity_gain_at_exemption_boundary_is_untaxed() {
        // Gain of exactly 100,000 held > 365 days: taxable = max(0, 0) = 0
        let assessment = assess(
            TaxRegime::EquityLike,
            date(2020, 1, 1),
            date(2023, 1, 1),
            dec!(100),
            dec!(1000),
            dec!(2000),
        );
        assert_eq!(assessment.gain, dec!(100000));
        assert_eq!(assessment.tax, Decimal::ZERO);
    }

    #[test]
    fn test_365_days_exactly_is_short_term() {
        let assessment = assess(
            TaxRegime::EquityLike,
            date(2023, 1, 1),
            date(2024, 1, 1),
            dec!(10),
            dec!(100),
            dec!(110),
        );
        assert_eq!(assessment.tax_type, TaxType::ShortTermCapitalGains);
    }

    #[test]
    fn test_debt_is_short_term_regardless_of_period() {
        let assessment = assess(
            TaxRegime::DebtLike,
            date(2018, 1, 1),
            date(2024, 1, 1),
            dec!(100),
            dec!(10),
            dec!(14),
        );
        assert_eq!(assessment.tax_type, TaxType::ShortTermCapitalGains);
        assert_eq!(assessment.tax, dec!(120.00));
    }

    #[test]
    fn test_unknown_regime_assesses_no_tax() {
        let assessment = assess(
            TaxRegime::Unknown,
            date(2023, 1, 1),
            date(2024, 1, 1),
            dec!(100),
            dec!(10),
            dec!(20),
        );
        assert_eq!(assessment.tax_type, TaxType::Unknown);
        assert_eq!(assessment.tax, Decimal::ZERO);
        assert_eq!(assessment.gain, dec!(1000));
    }

    #[test]
    fn test_loss_flows_through_unfloored() {
        let assessment = assess(
            TaxRegime::DebtLike,
            date(2023, 1, 1),
            date(2023, 6, 1),
            dec!(100),
            dec!(20),
            dec!(15),
        );
        assert_eq!(assessment.gain, dec!(-500));
        assert_eq!(assessment.tax, dec!(-150.00));
    }
}
