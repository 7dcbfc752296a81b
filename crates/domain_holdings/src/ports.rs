//! Holdings domain ports
//!
//! The holdings domain needs two collaborators: a NAV feed and a position
//! store. Both are port traits so adapters can be swapped - the HTTP feed
//! client and a database repository in production, in-memory doubles in
//! tests - without the domain knowing the difference.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{HolderId, PortError, PositionId, SchemeCode};

use crate::position::Position;

/// Price source for a scheme's NAV
///
/// The only I/O suspension point in a redemption: implementations fetch
/// over the network and must surface unavailability as
/// [`PortError::PriceUnavailable`] rather than inventing a price.
#[async_trait]
pub trait NavProvider: Send + Sync {
    /// The price point closest to `date` within the 50-day tolerance window
    async fn price_near(&self, scheme: SchemeCode, date: NaiveDate) -> Result<Decimal, PortError>;

    /// The most recent published price
    async fn latest_price(&self, scheme: SchemeCode) -> Result<Decimal, PortError>;
}

/// Persistence for position ledgers
///
/// Positions are stored whole, nested installments and redemptions
/// included; the redemption engine's validate-then-apply discipline means
/// a ledger is only ever saved in a fully consistent state.
#[async_trait]
pub trait PositionStore: Send + Sync {
    async fn get(&self, id: PositionId) -> Result<Position, PortError>;

    async fn save(&self, position: &Position) -> Result<(), PortError>;

    async fn find_by_holder(&self, holder_id: HolderId) -> Result<Vec<Position>, PortError>;

    /// Active SIP positions scheduled for contribution on this day of month
    async fn find_sip_due_on(&self, day_of_month: u8) -> Result<Vec<Position>, PortError>;
}
