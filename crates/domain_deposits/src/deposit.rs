//! Fixed deposit records and maturity arithmetic

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{DepositId, HolderId};

/// Compounding periods per year (quarterly)
const COMPOUNDING_PERIODS: f64 = 4.0;

/// Flat rate applied to interest earned
const INTEREST_TAX_RATE: Decimal = dec!(0.10);

/// A fixed deposit held at a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDeposit {
    /// Unique identifier
    pub id: DepositId,
    /// Bank the deposit is placed with
    pub bank: String,
    /// Bank account or receipt number
    pub account_number: String,
    /// Owning holder
    pub holder_id: HolderId,
    /// Nominated beneficiaries (up to three)
    pub nominees: Vec<HolderId>,
    /// Principal placed
    pub principal: Decimal,
    /// Annual interest rate in percent (e.g. 7.25)
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl FixedDeposit {
    /// Creates a new fixed deposit
    pub fn new(
        bank: impl Into<String>,
        account_number: impl Into<String>,
        holder_id: HolderId,
        principal: Decimal,
        interest_rate: Decimal,
        start_date: NaiveDate,
        maturity_date: NaiveDate,
    ) -> Self {
        Self {
            id: DepositId::new_v7(),
            bank: bank.into(),
            account_number: account_number.into(),
            holder_id,
            nominees: Vec::new(),
            principal,
            interest_rate,
            start_date,
            maturity_date,
            created_at: Utc::now(),
        }
    }

    /// Sets the nominated beneficiaries
    pub fn with_nominees(mut self, nominees: Vec<HolderId>) -> Self {
        self.nominees = nominees;
        self
    }

    /// Term of the deposit in years (365.25-day convention)
    fn term_years(&self) -> f64 {
        (self.maturity_date - self.start_date).num_days() as f64 / 365.25
    }

    /// Amount payable at maturity under quarterly compounding
    ///
    /// `A = P * (1 + r/4)^(4t)`, rounded to currency precision. A deposit
    /// with a non-positive principal, rate, or term matures at zero.
    pub fn maturity_amount(&self) -> Decimal {
        if self.principal <= Decimal::ZERO
            || self.interest_rate <= Decimal::ZERO
            || self.term_years() <= 0.0
        {
            return Decimal::ZERO;
        }

        let principal = self.principal.to_f64().unwrap_or(0.0);
        let rate = self.interest_rate.to_f64().unwrap_or(0.0) / 100.0;
        let amount = principal
            * (1.0 + rate / COMPOUNDING_PERIODS).powf(COMPOUNDING_PERIODS * self.term_years());

        Decimal::from_f64(amount).unwrap_or(Decimal::ZERO).round_dp(2)
    }

    /// Interest earned over the full term
    pub fn interest_earned(&self) -> Decimal {
        let maturity = self.maturity_amount();
        if maturity.is_zero() {
            return Decimal::ZERO;
        }
        maturity - self.principal
    }

    /// Tax on the interest: 10% of a positive interest figure, else zero
    pub fn tax(&self) -> Decimal {
        let interest = self.interest_earned();
        if interest <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (interest * INTEREST_TAX_RATE).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_year_deposit() -> FixedDeposit {
        FixedDeposit::new(
            "State Bank",
            "FD-0042-1187",
            HolderId::new(),
            dec!(100000),
            dec!(7),
            date(2022, 1, 1),
            date(2024, 1, 1),
        )
    }

    #[test]
    fn test_maturity_amount_quarterly_compounding() {
        // 100,000 at 7% quarterly for ~2 years: (1 + 0.0175)^8 ~ 1.1489
        let maturity = two_year_deposit().maturity_amount();
        assert!(maturity > dec!(114800) && maturity < dec!(114950), "got {maturity}");
    }

    #[test]
    fn test_interest_and_tax() {
        let fd = two_year_deposit();
        let interest = fd.interest_earned();
        assert!(interest > dec!(14800));
        assert_eq!(fd.tax(), (interest * dec!(0.10)).round_dp(2));
    }

    #[test]
    fn test_degenerate_terms_mature_at_zero() {
        let mut fd = two_year_deposit();
        fd.maturity_date = fd.start_date;
        assert_eq!(fd.maturity_amount(), Decimal::ZERO);
        assert_eq!(fd.tax(), Decimal::ZERO);

        let mut fd = two_year_deposit();
        fd.principal = Decimal::ZERO;
        assert_eq!(fd.maturity_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_serde_round_trip() {
        let fd = two_year_deposit();
        let json = serde_json::to_string(&fd).unwrap();
        let back: FixedDeposit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, fd.id);
        assert_eq!(back.maturity_amount(), fd.maturity_amount());
    }
}
