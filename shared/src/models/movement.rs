//! Stock movement models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Inventory receipt from a supplier
    #[serde(rename = "IN")]
    Purchase,
    /// Sale to a purchaser
    #[serde(rename = "OUT")]
    Sale,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Purchase => "IN",
            MovementKind::Sale => "OUT",
        }
    }

    /// Signed quantity this movement contributes to a balance
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            MovementKind::Purchase => quantity,
            MovementKind::Sale => -quantity,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(MovementKind::Purchase),
            "OUT" => Ok(MovementKind::Sale),
            other => Err(format!("unknown movement type '{}'", other)),
        }
    }
}

/// An immutable inventory receipt or sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub date: NaiveDate,
    /// Supplier for purchases, purchaser for sales
    pub counterparty_name: String,
    pub counterparty_contact: String,
    pub fish_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Fixed at write time, never recomputed
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// A validated movement waiting to be applied to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub date: NaiveDate,
    pub counterparty_name: String,
    pub counterparty_contact: String,
    pub fish_type: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Point-of-sale total from the request's unit price, fixed at validation
    pub total_price: Decimal,
}

impl NewMovement {
    /// Materialize the movement once storage has assigned an id and timestamp
    pub fn into_movement(self, id: i64, recorded_at: DateTime<Utc>) -> Movement {
        Movement {
            id,
            kind: self.kind,
            date: self.date,
            counterparty_name: self.counterparty_name,
            counterparty_contact: self.counterparty_contact,
            fish_type: self.fish_type,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.total_price,
            recorded_at,
        }
    }
}

/// Filter for reading the movement log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub limit: Option<i64>,
}
