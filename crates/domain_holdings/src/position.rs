//! Position ledgers
//!
//! A [`Position`] is one investment instrument held by one holder. Its
//! contribution and redemption history is append-only: units acquired are
//! fixed at purchase time from the NAV of that day and never recomputed,
//! and redemption records are never mutated or deleted once written.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{HolderId, InstallmentId, PositionId, SchemeCode};

use crate::error::HoldingsError;
use crate::redemption::Redemption;
use crate::units_for_amount;

/// Investment style of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentType {
    /// A single one-time contribution
    LumpSum,
    /// A systematic investment plan of recurring contributions
    Sip,
}

/// Lifecycle status of a SIP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SipStatus {
    Active,
    Inactive,
}

/// One investment position held by one holder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier
    pub id: PositionId,
    /// External scheme code used for NAV lookups
    pub scheme_code: SchemeCode,
    /// Scheme name; also the label the tax engine classifies on
    pub scheme_name: String,
    /// Fund house running the scheme
    pub fund_house: String,
    /// Owning holder
    pub holder_id: HolderId,
    /// Nominated beneficiaries (up to three)
    pub nominees: Vec<HolderId>,
    /// The contribution/redemption ledger
    pub holding: Holding,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// The ledger variant of a position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "investment_type", rename_all = "snake_case")]
pub enum Holding {
    LumpSum(LumpSumHolding),
    Sip(SipHolding),
}

/// Ledger of a single one-time contribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumHolding {
    /// Contribution amount
    pub amount: Decimal,
    /// Contribution date
    pub purchase_date: NaiveDate,
    /// Units acquired, fixed from the NAV at the purchase date
    pub units: Decimal,
    /// Running total of units redeemed
    pub redeemed_units: Decimal,
    /// Redemption records, append-only
    pub redemptions: Vec<Redemption>,
}

/// Ledger of a systematic investment plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipHolding {
    /// Contribution amount per installment
    pub installment_amount: Decimal,
    /// First scheduled contribution date
    pub start_date: NaiveDate,
    /// Set when the plan is deactivated
    pub end_date: Option<NaiveDate>,
    /// Scheduled day of month (1-31, clamped to short months)
    pub day_of_month: u8,
    /// Plan status
    pub status: SipStatus,
    /// Contribution records in chronological order
    pub installments: Vec<Installment>,
}

/// One SIP contribution (a tranche for FIFO redemption)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    /// Unique identifier
    pub id: InstallmentId,
    /// Contribution date
    pub date: NaiveDate,
    /// Contribution amount
    pub amount: Decimal,
    /// NAV at purchase
    pub nav: Decimal,
    /// Units acquired (= amount / nav), fixed at creation
    pub units: Decimal,
    /// Cumulative units redeemed from this installment
    pub redeemed_units: Decimal,
    /// Redemption records against this installment, append-only
    pub redemptions: Vec<Redemption>,
}

impl Installment {
    /// Creates an installment, deriving units from the purchase NAV
    pub fn new(date: NaiveDate, amount: Decimal, nav: Decimal) -> Self {
        Self {
            id: InstallmentId::new_v7(),
            date,
            amount,
            nav,
            units: units_for_amount(amount, nav),
            redeemed_units: Decimal::ZERO,
            redemptions: Vec::new(),
        }
    }

    /// Units still available for redemption from this installment
    pub fn available_units(&self) -> Decimal {
        self.units - self.redeemed_units
    }
}

impl LumpSumHolding {
    /// Units still available for redemption
    pub fn available_units(&self) -> Decimal {
        self.units - self.redeemed_units
    }

    /// Effective per-unit acquisition price
    pub fn acquisition_nav(&self) -> Result<Decimal, HoldingsError> {
        if self.units.is_zero() {
            return Err(HoldingsError::invalid_state(
                "lump sum holding has zero acquired units",
            ));
        }
        Ok(self.amount / self.units)
    }
}

impl SipHolding {
    /// Appends an installment, keeping the ledger in date order
    pub fn add_installment(&mut self, installment: Installment) {
        self.installments.push(installment);
        self.installments.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// Units still available across all installments
    pub fn available_units(&self) -> Decimal {
        self.installments.iter().map(|i| i.available_units()).sum()
    }

    /// Whether an active plan is due for contribution on this day of month
    pub fn is_due_on(&self, day_of_month: u8) -> bool {
        self.status == SipStatus::Active && self.day_of_month == day_of_month
    }

    /// Transitions the plan status
    ///
    /// Deactivating stamps `end_date`; a deactivated plan can never be
    /// reactivated. Setting the current status again is a no-op.
    pub fn set_status(&mut self, status: SipStatus, on: NaiveDate) -> Result<(), HoldingsError> {
        match (self.status, status) {
            (SipStatus::Active, SipStatus::Inactive) => {
                self.status = SipStatus::Inactive;
                self.end_date = Some(on);
                Ok(())
            }
            (SipStatus::Inactive, SipStatus::Active) => Err(HoldingsError::invalid_state(
                "an inactive SIP cannot be reactivated",
            )),
            _ => Ok(()),
        }
    }
}

impl Position {
    /// Creates a lump-sum position, deriving units from the purchase NAV
    pub fn new_lump_sum(
        scheme_code: SchemeCode,
        scheme_name: impl Into<String>,
        fund_house: impl Into<String>,
        holder_id: HolderId,
        amount: Decimal,
        purchase_date: NaiveDate,
        nav_at_purchase: Decimal,
    ) -> Self {
        Self {
            id: PositionId::new_v7(),
            scheme_code,
            scheme_name: scheme_name.into(),
            fund_house: fund_house.into(),
            holder_id,
            nominees: Vec::new(),
            holding: Holding::LumpSum(LumpSumHolding {
                amount,
                purchase_date,
                units: units_for_amount(amount, nav_at_purchase),
                redeemed_units: Decimal::ZERO,
                redemptions: Vec::new(),
            }),
            created_at: Utc::now(),
        }
    }

    /// Creates an active SIP position with an empty installment ledger
    ///
    /// # Errors
    ///
    /// Returns [`HoldingsError::Validation`] when `day_of_month` is outside
    /// 1-31.
    pub fn new_sip(
        scheme_code: SchemeCode,
        scheme_name: impl Into<String>,
        fund_house: impl Into<String>,
        holder_id: HolderId,
        installment_amount: Decimal,
        start_date: NaiveDate,
        day_of_month: u8,
    ) -> Result<Self, HoldingsError> {
        if !(1..=31).contains(&day_of_month) {
            return Err(HoldingsError::validation(format!(
                "SIP day of month must be between 1 and 31, got {day_of_month}"
            )));
        }
        Ok(Self {
            id: PositionId::new_v7(),
            scheme_code,
            scheme_name: scheme_name.into(),
            fund_house: fund_house.into(),
            holder_id,
            nominees: Vec::new(),
            holding: Holding::Sip(SipHolding {
                installment_amount,
                start_date,
                end_date: None,
                day_of_month,
                status: SipStatus::Active,
                installments: Vec::new(),
            }),
            created_at: Utc::now(),
        })
    }

    /// Sets the nominated beneficiaries
    pub fn with_nominees(mut self, nominees: Vec<HolderId>) -> Self {
        self.nominees = nominees;
        self
    }

    /// Investment style of this position
    pub fn investment_type(&self) -> InvestmentType {
        match self.holding {
            Holding::LumpSum(_) => InvestmentType::LumpSum,
            Holding::Sip(_) => InvestmentType::Sip,
        }
    }

    /// Total units ever acquired
    pub fn total_units(&self) -> Decimal {
        match &self.holding {
            Holding::LumpSum(ls) => ls.units,
            Holding::Sip(sip) => sip.installments.iter().map(|i| i.units).sum(),
        }
    }

    /// Total amount contributed
    pub fn invested_amount(&self) -> Decimal {
        match &self.holding {
            Holding::LumpSum(ls) => ls.amount,
            Holding::Sip(sip) => sip.installments.iter().map(|i| i.amount).sum(),
        }
    }

    /// Units still available for redemption
    ///
    /// # Errors
    ///
    /// Returns [`HoldingsError::InvalidState`] if the balance is negative,
    /// which the append-only ledger makes structurally impossible; the check
    /// guards against corrupted stored data.
    pub fn available_units(&self) -> Result<Decimal, HoldingsError> {
        let available = match &self.holding {
            Holding::LumpSum(ls) => ls.available_units(),
            Holding::Sip(sip) => sip.available_units(),
        };
        if available < Decimal::ZERO {
            return Err(HoldingsError::invalid_state(format!(
                "position {} has negative available units {available}",
                self.id
            )));
        }
        Ok(available)
    }

    /// Most recent redemption date across the whole position, if any
    ///
    /// Derived on demand from the redemption records rather than stored,
    /// so it can never drift from the ledger.
    pub fn last_redemption_date(&self) -> Option<NaiveDate> {
        match &self.holding {
            Holding::LumpSum(ls) => ls.redemptions.iter().map(|r| r.date).max(),
            Holding::Sip(sip) => sip
                .installments
                .iter()
                .flat_map(|i| i.redemptions.iter().map(|r| r.date))
                .max(),
        }
    }

    /// Borrows the SIP ledger, or fails for a lump-sum position
    pub fn sip(&self) -> Result<&SipHolding, HoldingsError> {
        match &self.holding {
            Holding::Sip(sip) => Ok(sip),
            Holding::LumpSum(_) => Err(HoldingsError::invalid_state(format!(
                "position {} is not a SIP",
                self.id
            ))),
        }
    }

    /// Mutably borrows the SIP ledger, or fails for a lump-sum position
    pub fn sip_mut(&mut self) -> Result<&mut SipHolding, HoldingsError> {
        match &mut self.holding {
            Holding::Sip(sip) => Ok(sip),
            Holding::LumpSum(_) => Err(HoldingsError::invalid_state(format!(
                "position {} is not a SIP",
                self.id
            ))),
        }
    }
}
