//! Ledger builders
//!
//! Construct positions with sensible defaults so tests only spell out the
//! fields they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{HolderId, SchemeCode};
use domain_holdings::position::{Installment, Position};

use crate::fixtures::{date, labels};

/// Builder for lump-sum positions
pub struct LumpSumPositionBuilder {
    scheme_code: SchemeCode,
    scheme_name: String,
    fund_house: String,
    holder_id: HolderId,
    amount: Decimal,
    purchase_date: NaiveDate,
    nav: Decimal,
}

impl Default for LumpSumPositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LumpSumPositionBuilder {
    pub fn new() -> Self {
        Self {
            scheme_code: SchemeCode(120503),
            scheme_name: labels::EQUITY.to_string(),
            fund_house: "Example AMC".to_string(),
            holder_id: HolderId::new(),
            amount: dec!(10000),
            purchase_date: date(2023, 1, 1),
            nav: dec!(40),
        }
    }

    pub fn with_scheme_name(mut self, name: impl Into<String>) -> Self {
        self.scheme_name = name.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_purchase(mut self, purchase_date: NaiveDate, nav: Decimal) -> Self {
        self.purchase_date = purchase_date;
        self.nav = nav;
        self
    }

    pub fn with_holder(mut self, holder_id: HolderId) -> Self {
        self.holder_id = holder_id;
        self
    }

    pub fn build(self) -> Position {
        Position::new_lump_sum(
            self.scheme_code,
            self.scheme_name,
            self.fund_house,
            self.holder_id,
            self.amount,
            self.purchase_date,
            self.nav,
        )
    }
}

/// Builder for SIP positions with pre-booked installments
pub struct SipPositionBuilder {
    scheme_code: SchemeCode,
    scheme_name: String,
    fund_house: String,
    holder_id: HolderId,
    installment_amount: Decimal,
    start_date: NaiveDate,
    day_of_month: u8,
    installments: Vec<(NaiveDate, Decimal)>,
}

impl Default for SipPositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SipPositionBuilder {
    pub fn new() -> Self {
        Self {
            scheme_code: SchemeCode(118834),
            scheme_name: labels::EQUITY.to_string(),
            fund_house: "Example AMC".to_string(),
            holder_id: HolderId::new(),
            installment_amount: dec!(500),
            start_date: date(2024, 1, 15),
            day_of_month: 15,
            installments: Vec::new(),
        }
    }

    pub fn with_scheme_name(mut self, name: impl Into<String>) -> Self {
        self.scheme_name = name.into();
        self
    }

    pub fn with_installment_amount(mut self, amount: Decimal) -> Self {
        self.installment_amount = amount;
        self
    }

    pub fn with_start(mut self, start_date: NaiveDate, day_of_month: u8) -> Self {
        self.start_date = start_date;
        self.day_of_month = day_of_month;
        self
    }

    pub fn with_holder(mut self, holder_id: HolderId) -> Self {
        self.holder_id = holder_id;
        self
    }

    /// Books an installment at the given date and purchase NAV
    pub fn with_installment(mut self, date: NaiveDate, nav: Decimal) -> Self {
        self.installments.push((date, nav));
        self
    }

    pub fn build(self) -> Position {
        let mut position = Position::new_sip(
            self.scheme_code,
            self.scheme_name,
            self.fund_house,
            self.holder_id,
            self.installment_amount,
            self.start_date,
            self.day_of_month,
        )
        .expect("builder produced an invalid SIP schedule day");
        let amount = self.installment_amount;
        if let Ok(sip) = position.sip_mut() {
            for (date, nav) in self.installments {
                sip.add_installment(Installment::new(date, amount, nav));
            }
        }
        position
    }
}
