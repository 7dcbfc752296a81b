//! Valuation engine
//!
//! Pure function of ledger state and a supplied price: no lookups, no side
//! effects, so valuating the same ledger twice at the same NAV always yields
//! the same figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PositionId;

use crate::error::HoldingsError;
use crate::position::Position;
use crate::value_of_units;

/// A point-in-time valuation of a position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    pub position_id: PositionId,
    /// Units still held
    pub units: Decimal,
    /// Per-unit price the valuation used
    pub nav: Decimal,
    /// Market value (units x nav, currency precision)
    pub value: Decimal,
    /// Amount contributed to date
    pub invested: Decimal,
}

/// Values a position at the given NAV
///
/// A position with zero available units values at exactly zero; that is a
/// fully redeemed holding, not an error.
pub fn value_position(position: &Position, nav: Decimal) -> Result<Valuation, HoldingsError> {
    let units = position.available_units()?;
    Ok(Valuation {
        position_id: position.id,
        units,
        nav,
        value: value_of_units(units, nav),
        invested: position.invested_amount(),
    })
}
