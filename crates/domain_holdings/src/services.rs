//! Holdings application services
//!
//! `HoldingsService` orchestrates the ledger operations across the two
//! ports: it fetches prices from the NAV feed, loads and saves positions,
//! and serializes redemptions per position.
//!
//! # Locking
//!
//! Redemption is a read-modify-write against one position's ledger, so the
//! service holds a per-position mutex for the duration of the
//! validate-then-apply sequence. The NAV fetch - the only network wait -
//! happens before the lock is taken, so a slow feed never extends the
//! critical section. Valuations take no lock: they read a single stored
//! snapshot and are pure thereafter.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use core_kernel::{HolderId, PortError, PositionId, SchemeCode};
use domain_returns::{cagr, xirr, CashFlow};

use crate::error::HoldingsError;
use crate::position::{Holding, Installment, Position, SipStatus};
use crate::redemption::{self, TaxSummary};
use crate::schedule;
use crate::valuation::{value_position, Valuation};
use crate::{ports::NavProvider, ports::PositionStore, value_of_units};

/// Which return measure applies to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    /// Single contribution: compound annual growth rate
    Cagr,
    /// Irregular contributions: money-weighted XIRR
    Xirr,
}

/// Annualized return of a position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMetric {
    pub position_id: PositionId,
    pub kind: ReturnKind,
    /// Annualized rate as a fraction; `None` when the solver could not
    /// produce a usable figure (reported as unavailable, never an error)
    pub value: Option<f64>,
}

/// Per-position result of a batch redemption sweep
#[derive(Debug)]
pub struct RedemptionOutcome {
    pub position_id: PositionId,
    pub result: Result<TaxSummary, HoldingsError>,
}

/// Per-position result of a due-installment sweep
#[derive(Debug)]
pub struct SweepOutcome {
    pub position_id: PositionId,
    /// Units recorded for the new installment on success
    pub result: Result<Decimal, HoldingsError>,
}

/// Request to open a lump-sum position
#[derive(Debug, Clone)]
pub struct NewLumpSumPosition {
    pub scheme_code: SchemeCode,
    pub scheme_name: String,
    pub fund_house: String,
    pub holder_id: HolderId,
    pub nominees: Vec<HolderId>,
    pub amount: Decimal,
    pub purchase_date: NaiveDate,
}

/// Request to open a SIP position
#[derive(Debug, Clone)]
pub struct NewSipPosition {
    pub scheme_code: SchemeCode,
    pub scheme_name: String,
    pub fund_house: String,
    pub holder_id: HolderId,
    pub nominees: Vec<HolderId>,
    pub installment_amount: Decimal,
    pub start_date: NaiveDate,
    pub day_of_month: u8,
}

/// Application service over the holdings ledger
pub struct HoldingsService {
    store: Arc<dyn PositionStore>,
    nav: Arc<dyn NavProvider>,
    locks: DashMap<PositionId, Arc<Mutex<()>>>,
}

impl HoldingsService {
    pub fn new(store: Arc<dyn PositionStore>, nav: Arc<dyn NavProvider>) -> Self {
        Self {
            store,
            nav,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, id: PositionId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Opens a lump-sum position, pricing it off the NAV at purchase date
    pub async fn open_lump_sum(
        &self,
        request: NewLumpSumPosition,
    ) -> Result<Position, HoldingsError> {
        let nav = self
            .nav
            .price_near(request.scheme_code, request.purchase_date)
            .await?;
        let position = Position::new_lump_sum(
            request.scheme_code,
            request.scheme_name,
            request.fund_house,
            request.holder_id,
            request.amount,
            request.purchase_date,
            nav,
        )
        .with_nominees(request.nominees);

        self.store.save(&position).await?;
        info!(position = %position.id, scheme = %position.scheme_code, "opened lump sum position");
        Ok(position)
    }

    /// Opens a SIP position and backfills installments up to `as_of`
    ///
    /// Months where the feed has no price within tolerance are skipped with
    /// a warning rather than failing the whole plan; the remaining schedule
    /// still books.
    pub async fn open_sip(
        &self,
        request: NewSipPosition,
        as_of: NaiveDate,
    ) -> Result<Position, HoldingsError> {
        let mut position = Position::new_sip(
            request.scheme_code,
            request.scheme_name,
            request.fund_house,
            request.holder_id,
            request.installment_amount,
            request.start_date,
            request.day_of_month,
        )?
        .with_nominees(request.nominees);

        let mut installments = Vec::new();
        for date in schedule::installment_dates(request.start_date, as_of, request.day_of_month) {
            match self.nav.price_near(request.scheme_code, date).await {
                Ok(nav) => {
                    installments.push(Installment::new(date, request.installment_amount, nav))
                }
                Err(PortError::PriceUnavailable { message }) => {
                    warn!(scheme = %request.scheme_code, %date, %message, "skipping installment without a price");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let sip = position.sip_mut()?;
        let booked = installments.len();
        for installment in installments {
            sip.add_installment(installment);
        }

        self.store.save(&position).await?;
        info!(position = %position.id, scheme = %position.scheme_code, booked, "opened SIP position");
        Ok(position)
    }

    /// Redeems units from a position at the latest published NAV
    ///
    /// The price is fetched before the position lock is taken; the lock
    /// covers load, validate-then-apply, and save.
    pub async fn redeem(
        &self,
        id: PositionId,
        units: Decimal,
        date: NaiveDate,
    ) -> Result<TaxSummary, HoldingsError> {
        let scheme_code = self.store.get(id).await?.scheme_code;
        let nav = self.nav.latest_price(scheme_code).await?;

        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut position = self.store.get(id).await?;
        let summary = redemption::redeem(&mut position, units, nav, date)?;
        self.store.save(&position).await?;

        info!(
            position = %id,
            units = %units,
            nav = %nav,
            tax = %summary.total_tax,
            "redeemed units"
        );
        Ok(summary)
    }

    /// Redeems across many positions independently
    ///
    /// One position's failure never rolls back or blocks the others; each
    /// outcome is reported individually. Non-positive requested quantities
    /// are skipped outright.
    pub async fn redeem_batch(
        &self,
        requests: &[(PositionId, Decimal)],
        date: NaiveDate,
    ) -> Vec<RedemptionOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for &(id, units) in requests {
            if units <= Decimal::ZERO {
                warn!(position = %id, units = %units, "skipping non-positive redemption request");
                continue;
            }
            let result = self.redeem(id, units, date).await;
            if let Err(err) = &result {
                warn!(position = %id, error = %err, "redemption failed");
            }
            outcomes.push(RedemptionOutcome {
                position_id: id,
                result,
            });
        }
        outcomes
    }

    /// Values a position at the latest published NAV
    pub async fn valuate(&self, id: PositionId) -> Result<Valuation, HoldingsError> {
        let position = self.store.get(id).await?;
        let nav = self.nav.latest_price(position.scheme_code).await?;
        value_position(&position, nav)
    }

    /// Values every position a holder owns
    ///
    /// Best-effort: a position whose scheme currently has no published
    /// price is left out of the report with a warning rather than failing
    /// the whole portfolio.
    pub async fn portfolio(&self, holder_id: HolderId) -> Result<Vec<Valuation>, HoldingsError> {
        let positions = self.store.find_by_holder(holder_id).await?;

        let mut valuations = Vec::with_capacity(positions.len());
        for position in positions {
            match self.nav.latest_price(position.scheme_code).await {
                Ok(nav) => valuations.push(value_position(&position, nav)?),
                Err(PortError::PriceUnavailable { message }) => {
                    warn!(position = %position.id, scheme = %position.scheme_code, %message,
                        "leaving unpriced position out of the portfolio");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(valuations)
    }

    /// Computes the annualized return of a position as of `as_of`
    ///
    /// Lump sums use CAGR over the single contribution; SIPs use XIRR over
    /// the installment outflows, any redemption proceeds, and the current
    /// value of the remaining units. A solver failure is reported as an
    /// unavailable figure, not an error.
    pub async fn compute_return(
        &self,
        id: PositionId,
        as_of: NaiveDate,
    ) -> Result<ReturnMetric, HoldingsError> {
        let position = self.store.get(id).await?;
        let nav = self.nav.latest_price(position.scheme_code).await?;
        let current_value = value_of_units(position.available_units()?, nav);

        match &position.holding {
            Holding::LumpSum(ls) => {
                let rate = cagr(
                    ls.amount.to_f64().unwrap_or(0.0),
                    current_value.to_f64().unwrap_or(0.0),
                    ls.purchase_date,
                    as_of,
                );
                Ok(ReturnMetric {
                    position_id: id,
                    kind: ReturnKind::Cagr,
                    value: Some(rate),
                })
            }
            Holding::Sip(sip) => {
                let mut flows: Vec<CashFlow> = Vec::new();
                for installment in &sip.installments {
                    flows.push(CashFlow::new(
                        installment.date,
                        -installment.amount.to_f64().unwrap_or(0.0),
                    ));
                    for redemption in &installment.redemptions {
                        let proceeds = value_of_units(redemption.units, redemption.nav);
                        flows.push(CashFlow::new(
                            redemption.date,
                            proceeds.to_f64().unwrap_or(0.0),
                        ));
                    }
                }
                if current_value > Decimal::ZERO {
                    flows.push(CashFlow::new(as_of, current_value.to_f64().unwrap_or(0.0)));
                }

                let value = match xirr(&flows) {
                    Ok(rate) => rate,
                    Err(err) => {
                        warn!(position = %id, error = %err, "XIRR input unusable, reporting unavailable");
                        None
                    }
                };
                Ok(ReturnMetric {
                    position_id: id,
                    kind: ReturnKind::Xirr,
                    value,
                })
            }
        }
    }

    /// Records due installments for every active SIP scheduled on this day
    ///
    /// Positions are processed independently: a feed or store failure on
    /// one is reported in its outcome and the sweep continues.
    pub async fn record_due_installments(
        &self,
        day_of_month: u8,
        on: NaiveDate,
    ) -> Result<Vec<SweepOutcome>, HoldingsError> {
        let due = self.store.find_sip_due_on(day_of_month).await?;
        info!(day_of_month, count = due.len(), "running due-installment sweep");

        let mut outcomes = Vec::with_capacity(due.len());
        for position in due {
            let result = self.record_installment(position.id, position.scheme_code, on).await;
            if let Err(err) = &result {
                warn!(position = %position.id, error = %err, "failed to record installment");
            }
            outcomes.push(SweepOutcome {
                position_id: position.id,
                result,
            });
        }
        Ok(outcomes)
    }

    async fn record_installment(
        &self,
        id: PositionId,
        scheme_code: SchemeCode,
        on: NaiveDate,
    ) -> Result<Decimal, HoldingsError> {
        let nav = self.nav.latest_price(scheme_code).await?;

        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut position = self.store.get(id).await?;
        let sip = position.sip_mut()?;
        if sip.status != SipStatus::Active {
            return Err(HoldingsError::invalid_state(format!(
                "SIP {id} is no longer active"
            )));
        }
        let installment = Installment::new(on, sip.installment_amount, nav);
        let units = installment.units;
        sip.add_installment(installment);

        self.store.save(&position).await?;
        info!(position = %id, %nav, %units, "recorded SIP installment");
        Ok(units)
    }

    /// Deactivates a SIP, stamping its end date
    pub async fn deactivate_sip(&self, id: PositionId, on: NaiveDate) -> Result<(), HoldingsError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut position = self.store.get(id).await?;
        position.sip_mut()?.set_status(SipStatus::Inactive, on)?;
        self.store.save(&position).await?;

        info!(position = %id, %on, "deactivated SIP");
        Ok(())
    }
}
