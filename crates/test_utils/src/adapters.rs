//! In-memory port adapters

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use core_kernel::{HolderId, PortError, PositionId, SchemeCode};
use domain_holdings::nav::NavHistory;
use domain_holdings::ports::{NavProvider, PositionStore};
use domain_holdings::position::{Holding, Position};

/// Position store backed by a map
#[derive(Default)]
pub struct InMemoryPositionStore {
    positions: RwLock<HashMap<PositionId, Position>>,
}

impl InMemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a position
    pub async fn insert(&self, position: Position) {
        self.positions.write().await.insert(position.id, position);
    }

    /// Reads a position back, panicking when it was never stored
    pub async fn get_position(&self, id: PositionId) -> Position {
        self.positions
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_else(|| panic!("position {id} not in store"))
    }

    pub async fn len(&self) -> usize {
        self.positions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.positions.read().await.is_empty()
    }
}

#[async_trait]
impl PositionStore for InMemoryPositionStore {
    async fn get(&self, id: PositionId) -> Result<Position, PortError> {
        self.positions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Position", id))
    }

    async fn save(&self, position: &Position) -> Result<(), PortError> {
        self.positions
            .write()
            .await
            .insert(position.id, position.clone());
        Ok(())
    }

    async fn find_by_holder(&self, holder_id: HolderId) -> Result<Vec<Position>, PortError> {
        Ok(self
            .positions
            .read()
            .await
            .values()
            .filter(|p| p.holder_id == holder_id)
            .cloned()
            .collect())
    }

    async fn find_sip_due_on(&self, day_of_month: u8) -> Result<Vec<Position>, PortError> {
        Ok(self
            .positions
            .read()
            .await
            .values()
            .filter(|p| match &p.holding {
                Holding::Sip(sip) => sip.is_due_on(day_of_month),
                Holding::LumpSum(_) => false,
            })
            .cloned()
            .collect())
    }
}

/// NAV provider answering from fixed in-memory histories
#[derive(Default)]
pub struct FixedNavProvider {
    histories: HashMap<SchemeCode, NavHistory>,
}

impl FixedNavProvider {
    /// A provider with no data; every lookup reports price unavailable
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, history: NavHistory) -> Self {
        self.histories.insert(history.scheme_code, history);
        self
    }
}

#[async_trait]
impl NavProvider for FixedNavProvider {
    async fn price_near(&self, scheme: SchemeCode, date: NaiveDate) -> Result<Decimal, PortError> {
        self.histories
            .get(&scheme)
            .and_then(|h| h.price_near(date))
            .ok_or_else(|| {
                PortError::price_unavailable(format!(
                    "no price for scheme {scheme} within tolerance of {date}"
                ))
            })
    }

    async fn latest_price(&self, scheme: SchemeCode) -> Result<Decimal, PortError> {
        self.histories
            .get(&scheme)
            .and_then(|h| h.latest())
            .map(|p| p.value)
            .ok_or_else(|| PortError::price_unavailable(format!("no prices for scheme {scheme}")))
    }
}
