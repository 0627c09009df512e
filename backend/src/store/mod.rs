//! Storage handle for the stock ledger
//!
//! The movement log and the per-fish-type balances are two independent
//! tables; [`LedgerStore::apply_movement`] is the only write path that
//! touches both, and it does so as a single atomic unit.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{
    BalanceError, FishSales, Movement, MovementFilter, NewMovement, SalesSummary, StockBalance,
    TrendPoint,
};
use shared::reporting::TotalOutOfRange;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Storage-level failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// A sale asked for more than the balance holds; nothing was written
    #[error("insufficient stock: {available} available")]
    InsufficientStock { available: Decimal },

    /// A purchase would push the balance past the representable range
    #[error("balance out of range")]
    BalanceOutOfRange,

    /// A report aggregate left the representable range
    #[error("report total out of range")]
    TotalOutOfRange,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be mapped back into a domain value
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<BalanceError> for StoreError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::Insufficient { available } => StoreError::InsufficientStock { available },
            BalanceError::OutOfRange => StoreError::BalanceOutOfRange,
        }
    }
}

impl From<TotalOutOfRange> for StoreError {
    fn from(_: TotalOutOfRange) -> Self {
        StoreError::TotalOutOfRange
    }
}

/// Outcome of an accepted movement
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMovement {
    pub movement: Movement,
    /// Balance for the movement's fish type after the adjustment
    pub balance: Decimal,
}

/// Abstraction over durable ledger storage engines.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a movement and adjust its fish type's balance atomically.
    ///
    /// Purchases create the balance row on first reference. Sales succeed
    /// only when the existing balance covers the requested quantity;
    /// otherwise `StoreError::InsufficientStock` is returned and neither
    /// table changes.
    async fn apply_movement(&self, movement: NewMovement) -> StoreResult<AppliedMovement>;

    /// Current balance, `None` for a fish type never seen
    async fn balance(&self, fish_type: &str) -> StoreResult<Option<Decimal>>;

    /// All balances ordered by fish type
    async fn balances(&self) -> StoreResult<Vec<StockBalance>>;

    /// Fish types that have a balance row, ordered
    async fn fish_types(&self) -> StoreResult<Vec<String>>;

    /// Zero every balance, leaving the movement log untouched. Returns rows touched.
    async fn reset_balances(&self) -> StoreResult<u64>;

    /// Movement log, newest business date first
    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<Movement>>;

    async fn sales_summary(&self) -> StoreResult<SalesSummary>;

    async fn sales_by_fish_type(&self) -> StoreResult<Vec<FishSales>>;

    async fn monthly_trend(&self) -> StoreResult<Vec<TrendPoint>>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> StoreResult<()>;
}
