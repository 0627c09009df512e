//! PostgreSQL implementation of the LedgerStore trait
//!
//! All queries bind caller-supplied values as parameters, including the
//! movement type filter and the result limit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::models::{
    FishSales, Movement, MovementFilter, MovementKind, NewMovement, SalesSummary, StockBalance,
    TrendPoint,
};
use sqlx::{FromRow, PgPool};

use super::{AppliedMovement, LedgerStore, StoreError, StoreResult};

/// LedgerStore backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgLedgerStore {
    db: PgPool,
}

/// Row for movement queries
#[derive(Debug, FromRow)]
struct MovementRow {
    id: i64,
    kind: String,
    date: NaiveDate,
    counterparty_name: String,
    counterparty_contact: String,
    fish_type: String,
    quantity: Decimal,
    unit_price: Decimal,
    total_price: Decimal,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = StoreError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<MovementKind>()
            .map_err(|e| StoreError::Corrupt(format!("movement {}: {}", row.id, e)))?;

        Ok(Movement {
            id: row.id,
            kind,
            date: row.date,
            counterparty_name: row.counterparty_name,
            counterparty_contact: row.counterparty_contact,
            fish_type: row.fish_type,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            recorded_at: row.recorded_at,
        })
    }
}

/// Row for balance queries
#[derive(Debug, FromRow)]
struct BalanceRow {
    fish_type: String,
    quantity: Decimal,
    last_updated: DateTime<Utc>,
}

impl From<BalanceRow> for StockBalance {
    fn from(row: BalanceRow) -> Self {
        StockBalance {
            fish_type: row.fish_type,
            quantity: row.quantity,
            last_updated: row.last_updated,
        }
    }
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore over an existing pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply the bundled schema migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn apply_movement(&self, movement: NewMovement) -> StoreResult<AppliedMovement> {
        // Dropping the transaction without commit rolls it back, so every
        // early return below leaves both tables untouched.
        let mut tx = self.db.begin().await?;

        let balance = match movement.kind {
            MovementKind::Purchase => {
                // The guard keeps the stored balance decodable as a Decimal
                sqlx::query_scalar::<_, Decimal>(
                    r#"
                    INSERT INTO stock_balances (fish_type, quantity, last_updated)
                    VALUES ($1, $2, NOW())
                    ON CONFLICT (fish_type) DO UPDATE
                    SET quantity = stock_balances.quantity + EXCLUDED.quantity,
                        last_updated = NOW()
                    WHERE stock_balances.quantity + EXCLUDED.quantity <= $3
                    RETURNING quantity
                    "#,
                )
                .bind(&movement.fish_type)
                .bind(movement.quantity)
                .bind(Decimal::MAX)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::BalanceOutOfRange)?
            }
            MovementKind::Sale => {
                // Conditional decrement: the row lock taken here serializes
                // concurrent sales of the same fish type.
                let remaining = sqlx::query_scalar::<_, Decimal>(
                    r#"
                    UPDATE stock_balances
                    SET quantity = quantity - $1, last_updated = NOW()
                    WHERE fish_type = $2 AND quantity >= $1
                    RETURNING quantity
                    "#,
                )
                .bind(movement.quantity)
                .bind(&movement.fish_type)
                .fetch_optional(&mut *tx)
                .await?;

                match remaining {
                    Some(quantity) => quantity,
                    None => {
                        let available = sqlx::query_scalar::<_, Decimal>(
                            "SELECT quantity FROM stock_balances WHERE fish_type = $1",
                        )
                        .bind(&movement.fish_type)
                        .fetch_optional(&mut *tx)
                        .await?
                        .unwrap_or(Decimal::ZERO);

                        return Err(StoreError::InsufficientStock { available });
                    }
                }
            }
        };

        let row = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (
                kind, date, counterparty_name, counterparty_contact, fish_type,
                quantity, unit_price, total_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, kind, date, counterparty_name, counterparty_contact, fish_type,
                      quantity, unit_price, total_price, recorded_at
            "#,
        )
        .bind(movement.kind.as_str())
        .bind(movement.date)
        .bind(&movement.counterparty_name)
        .bind(&movement.counterparty_contact)
        .bind(&movement.fish_type)
        .bind(movement.quantity)
        .bind(movement.unit_price)
        .bind(movement.total_price)
        .fetch_one(&mut *tx)
        .await?;

        let movement = Movement::try_from(row)?;
        tx.commit().await?;

        Ok(AppliedMovement { movement, balance })
    }

    async fn balance(&self, fish_type: &str) -> StoreResult<Option<Decimal>> {
        let quantity = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM stock_balances WHERE fish_type = $1",
        )
        .bind(fish_type)
        .fetch_optional(&self.db)
        .await?;

        Ok(quantity)
    }

    async fn balances(&self) -> StoreResult<Vec<StockBalance>> {
        let rows = sqlx::query_as::<_, BalanceRow>(
            "SELECT fish_type, quantity, last_updated FROM stock_balances ORDER BY fish_type",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockBalance::from).collect())
    }

    async fn fish_types(&self) -> StoreResult<Vec<String>> {
        let types = sqlx::query_scalar::<_, String>(
            "SELECT fish_type FROM stock_balances ORDER BY fish_type",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(types)
    }

    async fn reset_balances(&self) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE stock_balances SET quantity = 0, last_updated = NOW()")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<Movement>> {
        // LIMIT NULL means no limit in PostgreSQL
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, kind, date, counterparty_name, counterparty_contact, fish_type,
                   quantity, unit_price, total_price, recorded_at
            FROM stock_movements
            WHERE ($1::TEXT IS NULL OR kind = $1)
            ORDER BY date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Movement::try_from).collect()
    }

    async fn sales_summary(&self) -> StoreResult<SalesSummary> {
        let (total_sales, total_purchases, total_transactions) =
            sqlx::query_as::<_, (Decimal, Decimal, i64)>(
                r#"
                SELECT COALESCE(SUM(total_price) FILTER (WHERE kind = 'OUT'), 0),
                       COALESCE(SUM(total_price) FILTER (WHERE kind = 'IN'), 0),
                       COUNT(*)
                FROM stock_movements
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        Ok(SalesSummary {
            total_sales,
            total_purchases,
            profit: total_sales - total_purchases,
            total_transactions,
        })
    }

    async fn sales_by_fish_type(&self) -> StoreResult<Vec<FishSales>> {
        let rows = sqlx::query_as::<_, (String, Decimal, Decimal)>(
            r#"
            SELECT fish_type, SUM(quantity), SUM(total_price)
            FROM stock_movements
            WHERE kind = 'OUT'
            GROUP BY fish_type
            ORDER BY fish_type
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(fish_type, total_quantity, total_value)| FishSales {
                fish_type,
                total_quantity,
                total_value,
            })
            .collect())
    }

    async fn monthly_trend(&self) -> StoreResult<Vec<TrendPoint>> {
        let rows = sqlx::query_as::<_, (String, String, Decimal)>(
            r#"
            SELECT to_char(date, 'YYYY-MM') AS month, kind, SUM(total_price)
            FROM stock_movements
            GROUP BY month, kind
            ORDER BY month
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut sales = BTreeMap::new();
        let mut purchases = BTreeMap::new();
        for (month, kind, total) in rows {
            match kind.parse::<MovementKind>().map_err(StoreError::Corrupt)? {
                MovementKind::Sale => sales.insert(month, total),
                MovementKind::Purchase => purchases.insert(month, total),
            };
        }

        Ok(sales
            .into_iter()
            .map(|(month, sales)| TrendPoint::Sales { month, sales })
            .chain(
                purchases
                    .into_iter()
                    .map(|(month, purchases)| TrendPoint::Purchases { month, purchases }),
            )
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
