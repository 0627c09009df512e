//! In-memory aggregation over the movement log
//!
//! These mirror the SQL aggregates used by the database-backed store, so
//! both storage engines report identical figures. Sums are checked: a log
//! whose totals leave the decimal range yields [`TotalOutOfRange`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{FishSales, Movement, MovementKind, SalesSummary, TrendPoint};

/// An aggregate exceeded the decimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("report total out of range")]
pub struct TotalOutOfRange;

fn add(acc: &mut Decimal, value: Decimal) -> Result<(), TotalOutOfRange> {
    *acc = acc.checked_add(value).ok_or(TotalOutOfRange)?;
    Ok(())
}

/// Calendar month key (`YYYY-MM`) of a movement's business date
pub fn month_key(movement: &Movement) -> String {
    movement.date.format("%Y-%m").to_string()
}

/// Sale and purchase totals, profit and combined movement count
pub fn summarize(movements: &[Movement]) -> Result<SalesSummary, TotalOutOfRange> {
    let mut total_sales = Decimal::ZERO;
    let mut total_purchases = Decimal::ZERO;

    for movement in movements {
        match movement.kind {
            MovementKind::Sale => add(&mut total_sales, movement.total_price)?,
            MovementKind::Purchase => add(&mut total_purchases, movement.total_price)?,
        }
    }

    Ok(SalesSummary {
        total_sales,
        total_purchases,
        profit: total_sales
            .checked_sub(total_purchases)
            .ok_or(TotalOutOfRange)?,
        total_transactions: movements.len() as i64,
    })
}

/// Sales quantity and value per fish type, ordered by fish type
pub fn sales_by_fish_type(movements: &[Movement]) -> Result<Vec<FishSales>, TotalOutOfRange> {
    let mut by_fish: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();

    for movement in movements.iter().filter(|m| m.kind == MovementKind::Sale) {
        let entry = by_fish
            .entry(movement.fish_type.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        add(&mut entry.0, movement.quantity)?;
        add(&mut entry.1, movement.total_price)?;
    }

    Ok(by_fish
        .into_iter()
        .map(|(fish_type, (total_quantity, total_value))| FishSales {
            fish_type: fish_type.to_string(),
            total_quantity,
            total_value,
        })
        .collect())
}

/// Sparse monthly series: all sales months first, then all purchase months
pub fn monthly_trend(movements: &[Movement]) -> Result<Vec<TrendPoint>, TotalOutOfRange> {
    let mut sales: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut purchases: BTreeMap<String, Decimal> = BTreeMap::new();

    for movement in movements {
        let series = match movement.kind {
            MovementKind::Sale => &mut sales,
            MovementKind::Purchase => &mut purchases,
        };
        add(
            series.entry(month_key(movement)).or_insert(Decimal::ZERO),
            movement.total_price,
        )?;
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
