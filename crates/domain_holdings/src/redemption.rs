//! Redemption engine
//!
//! Applies a redemption request against a position's ledger. SIP positions
//! are consumed FIFO across installments, oldest first. The engine builds a
//! full consumption plan against the ledger before touching it: either the
//! whole requested quantity is satisfiable and the ledger is mutated, or
//! nothing is written (validate-then-apply, not apply-then-rollback).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{InstallmentId, PositionId};

use crate::error::HoldingsError;
use crate::position::{Holding, Position};
use crate::tax::{assess, classify_regime, TaxType};

/// An immutable record of a partial or full sale
///
/// Created only by the redemption engine at the moment units are sold;
/// never mutated or deleted afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub date: NaiveDate,
    pub units: Decimal,
    /// NAV at redemption
    pub nav: Decimal,
    pub tax_type: TaxType,
    pub tax: Decimal,
    pub gain: Decimal,
}

/// Tax outcome for one consumed tranche
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrancheRedemption {
    /// The installment consumed; `None` for a lump-sum tranche
    pub installment_id: Option<InstallmentId>,
    pub acquisition_date: NaiveDate,
    pub units: Decimal,
    pub tax_type: TaxType,
    pub tax: Decimal,
    pub gain: Decimal,
}

/// Aggregated tax outcome of one redemption request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummary {
    pub position_id: PositionId,
    pub scheme_name: String,
    pub redemption_date: NaiveDate,
    pub units_redeemed: Decimal,
    /// NAV the sale was executed at
    pub nav: Decimal,
    pub total_tax: Decimal,
    pub total_gain: Decimal,
    /// Per-tranche breakdown, in consumption order
    pub tranches: Vec<TrancheRedemption>,
}

/// One planned consumption step: installment index and units to take
struct PlanStep {
    installment_index: usize,
    units: Decimal,
}

/// Redeems units from a position at the given NAV
///
/// # Arguments
///
/// * `position` - The ledger to redeem against
/// * `units` - Units to sell; must be positive and within availability
/// * `nav` - Current per-unit price from the NAV provider
/// * `date` - Redemption date
///
/// # Errors
///
/// [`HoldingsError::InsufficientUnits`] when the request is non-positive or
/// exceeds the available balance; the ledger is left untouched.
///
/// # Example
///
/// ```rust,ignore
/// let summary = redeem(&mut position, dec!(15), dec!(62.50), today)?;
/// println!("tax owed: {}", summary.total_tax);
/// ```
pub fn redeem(
    position: &mut Position,
    units: Decimal,
    nav: Decimal,
    date: NaiveDate,
) -> Result<TaxSummary, HoldingsError> {
    let available = position.available_units()?;
    if units <= Decimal::ZERO || units > available {
        return Err(HoldingsError::InsufficientUnits {
            requested: units,
            available,
        });
    }

    let regime = classify_regime(&position.scheme_name);
    let mut tranches = Vec::new();

    match &mut position.holding {
        Holding::LumpSum(ls) => {
            let acquisition_nav = ls.acquisition_nav()?;
            let assessment = assess(regime, ls.purchase_date, date, units, acquisition_nav, nav);

            ls.redemptions.push(Redemption {
                date,
                units,
                nav,
                tax_type: assessment.tax_type,
                tax: assessment.tax,
                gain: assessment.gain,
            });
            ls.redeemed_units += units;

            tranches.push(TrancheRedemption {
                installment_id: None,
                acquisition_date: ls.purchase_date,
                units,
                tax_type: assessment.tax_type,
                tax: assessment.tax,
                gain: assessment.gain,
            });
        }
        Holding::Sip(sip) => {
            // Plan first: walk installments oldest-first and decide how many
            // units each tranche contributes, without mutating anything.
            let mut order: Vec<usize> = (0..sip.installments.len()).collect();
            order.sort_by_key(|&i| sip.installments[i].date);

            let mut remaining = units;
            let mut plan = Vec::new();
            for index in order {
                if remaining <= Decimal::ZERO {
                    break;
                }
                let tranche_available = sip.installments[index].available_units();
                if tranche_available <= Decimal::ZERO {
                    continue;
                }
                let take = remaining.min(tranche_available);
                plan.push(PlanStep {
                    installment_index: index,
                    units: take,
                });
                remaining -= take;
            }
            if remaining > Decimal::ZERO {
                // Unreachable given the pre-check; kept so a partially built
                // plan can never be applied.
                return Err(HoldingsError::InsufficientUnits {
                    requested: units,
                    available,
                });
            }

            // Apply: the plan covers the full request, so every step commits.
            for step in plan {
                let installment = &mut sip.installments[step.installment_index];
                let assessment = assess(
                    regime,
                    installment.date,
                    date,
                    step.units,
                    installment.nav,
                    nav,
                );

                installment.redemptions.push(Redemption {
                    date,
                    units: step.units,
                    nav,
                    tax_type: assessment.tax_type,
                    tax: assessment.tax,
                    gain: assessment.gain,
                });
                installment.redeemed_units += step.units;

                tranches.push(TrancheRedemption {
                    installment_id: Some(installment.id),
                    acquisition_date: installment.date,
                    units: step.units,
                    tax_type: assessment.tax_type,
                    tax: assessment.tax,
                    gain: assessment.gain,
                });
            }
        }
    }

    let total_tax = tranches.iter().map(|t| t.tax).sum();
    let total_gain = tranches.iter().map(|t| t.gain).sum();

    Ok(TaxSummary {
        position_id: position.id,
        scheme_name: position.scheme_name.clone(),
        redemption_date: date,
        units_redeemed: units,
        nav,
        total_tax,
        total_gain,
        tranches,
    })
}
