//! In-memory implementation of the LedgerStore trait for testing and development
//!
//! A single async mutex guards both the balances and the movement log, so
//! the check-then-adjust sequence of a sale can never interleave with
//! another write.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    FishSales, Movement, MovementFilter, MovementKind, NewMovement, SalesSummary, StockBalance,
    TrendPoint,
};
use shared::reporting;
use tokio::sync::Mutex;

use super::{AppliedMovement, LedgerStore, StoreError, StoreResult};

#[derive(Default)]
struct Ledger {
    balances: BTreeMap<String, StockBalance>,
    movements: Vec<Movement>,
    next_id: i64,
}

/// LedgerStore kept entirely in process memory
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: Mutex<Ledger>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of movements in the log
    pub async fn movement_count(&self) -> usize {
        self.inner.lock().await.movements.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn apply_movement(&self, movement: NewMovement) -> StoreResult<AppliedMovement> {
        let mut ledger = self.inner.lock().await;
        let now = Utc::now();

        // Work on a copy so a rejected movement leaves the ledger untouched
        let mut entry = match ledger.balances.get(&movement.fish_type) {
            Some(existing) => existing.clone(),
            // A sale never creates a balance row
            None if movement.kind == MovementKind::Sale => {
                return Err(StoreError::InsufficientStock {
                    available: Decimal::ZERO,
                })
            }
            None => StockBalance::empty(movement.fish_type.clone(), now),
        };
        let balance = entry.apply(movement.kind, movement.quantity, now)?;

        ledger.next_id += 1;
        let movement = movement.into_movement(ledger.next_id, now);
        ledger.balances.insert(entry.fish_type.clone(), entry);
        ledger.movements.push(movement.clone());

        Ok(AppliedMovement { movement, balance })
    }

    async fn balance(&self, fish_type: &str) -> StoreResult<Option<Decimal>> {
        let ledger = self.inner.lock().await;
        Ok(ledger.balances.get(fish_type).map(|b| b.quantity))
    }

    async fn balances(&self) -> StoreResult<Vec<StockBalance>> {
        let ledger = self.inner.lock().await;
        Ok(ledger.balances.values().cloned().collect())
    }

    async fn fish_types(&self) -> StoreResult<Vec<String>> {
        let ledger = self.inner.lock().await;
        Ok(ledger.balances.keys().cloned().collect())
    }

    async fn reset_balances(&self) -> StoreResult<u64> {
        let mut ledger = self.inner.lock().await;
        let now = Utc::now();
        for balance in ledger.balances.values_mut() {
            balance.reset(now);
        }
        Ok(ledger.balances.len() as u64)
    }

    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<Movement>> {
        let ledger = self.inner.lock().await;
        let mut movements: Vec<Movement> = ledger
            .movements
            .iter()
            .filter(|m| filter.kind.map_or(true, |kind| m.kind == kind))
            .cloned()
            .collect();
        movements.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        if let Some(limit) = filter.limit {
            movements.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(movements)
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        let ledger = self.inner.lock().await;
        Ok(reporting::summarize(&ledger.movements)?)
    }

    async fn sales_by_fish_type(&self) -> StoreResult<Vec<FishSales>> {
        let ledger = self.inner.lock().await;
        Ok(reporting::sales_by_fish_type(&ledger.movements)?)
    }

    async fn monthly_trend(&self) -> StoreResult<Vec<TrendPoint>> {
        let ledger = self.inner.lock().await;
        Ok(reporting::monthly_trend(&ledger.movements)?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
