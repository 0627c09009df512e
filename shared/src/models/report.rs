//! Read-only report rows derived from the movement log

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals across the whole movement log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_purchases: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
    /// Purchases and sales combined
    pub total_transactions: i64,
}

/// Sales breakdown for one fish type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSales {
    pub fish_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}

/// One month of one series in the monthly trend.
///
/// Months without activity are absent, never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrendPoint {
    Sales {
        month: String,
        #[serde(with = "rust_decimal::serde::float")]
        sales: Decimal,
    },
    Purchases {
        month: String,
        #[serde(with = "rust_decimal::serde::float")]
        purchases: Decimal,
    },
}

impl TrendPoint {
    pub fn month(&self) -> &str {
        match self {
            TrendPoint::Sales { month, .. } | TrendPoint::Purchases { month, .. } => month,
        }
    }
}
