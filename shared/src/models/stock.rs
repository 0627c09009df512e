//! Running stock balance models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MovementKind;

/// Current on-hand quantity for one fish type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBalance {
    pub fish_type: String,
    /// Never driven negative by a sale
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Why a movement could not be applied to a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("insufficient stock: {available} available")]
    Insufficient { available: Decimal },

    #[error("balance out of range")]
    OutOfRange,
}

impl StockBalance {
    /// A fresh balance, created the first time a fish type is referenced
    pub fn empty(fish_type: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            fish_type: fish_type.into(),
            quantity: Decimal::ZERO,
            last_updated: now,
        }
    }

    /// Apply a movement of `quantity`, rejecting a sale that would overdraw.
    ///
    /// On any error the balance is left untouched.
    pub fn apply(
        &mut self,
        kind: MovementKind,
        quantity: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, BalanceError> {
        if kind == MovementKind::Sale && self.quantity < quantity {
            return Err(BalanceError::Insufficient {
                available: self.quantity,
            });
        }
        let next = self
            .quantity
            .checked_add(kind.signed(quantity))
            .ok_or(BalanceError::OutOfRange)?;

        self.quantity = next;
        self.last_updated = now;
        Ok(next)
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.quantity = Decimal::ZERO;
        self.last_updated = now;
    }
}
