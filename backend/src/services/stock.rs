//! Stock service: the single entry point for quantity-affecting operations
//!
//! Keeps each fish type's balance equal to the signed sum of its movements
//! since the last reset. Purchases add, sales subtract, and a sale that
//! would overdraw is rejected without touching either table.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Movement, MovementFilter, MovementKind, NewMovement, StockBalance};
use shared::validation::{
    checked_total, expect_kind, parse_date, parse_kind, require_decimal, require_text,
    validate_limit, validate_non_negative, validate_positive, ValidationError,
};

use crate::error::{AppError, AppResult};
use crate::store::{AppliedMovement, LedgerStore, StoreError};

/// Stock service for recording purchases and sales against the ledger
#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn LedgerStore>,
}

/// Input for recording an inventory receipt
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPurchaseInput {
    pub date: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_contact: Option<String>,
    pub fish_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// Input for recording a sale
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleInput {
    pub date: Option<String>,
    pub purchaser_name: Option<String>,
    pub purchaser_contact: Option<String>,
    pub fish_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// Query for listing movements
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListMovementsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<i64>,
}

impl RecordPurchaseInput {
    /// Validate fields in request order and build the movement
    pub fn into_movement(self) -> Result<NewMovement, ValidationError> {
        let date = require_text("date", self.date.as_deref())?;
        let date = parse_date("date", &date)?;
        let counterparty_name = require_text("supplierName", self.supplier_name.as_deref())?;
        let counterparty_contact =
            require_text("supplierContact", self.supplier_contact.as_deref())?;
        let fish_type = require_text("fishType", self.fish_type.as_deref())?;
        let kind = require_text("type", self.kind.as_deref())?;
        expect_kind("type", Some(kind.as_str()), MovementKind::Purchase)?;
        let quantity = require_decimal("quantity", self.quantity)?;
        validate_positive("quantity", quantity)?;
        let unit_price = require_decimal("unitPrice", self.unit_price)?;
        validate_non_negative("unitPrice", unit_price)?;
        let total_price = checked_total(quantity, unit_price)?;

        Ok(NewMovement {
            kind: MovementKind::Purchase,
            date,
            counterparty_name,
            counterparty_contact,
            fish_type,
            quantity,
            unit_price,
            total_price,
        })
    }
}

impl RecordSaleInput {
    /// Validate fields in request order and build the movement
    pub fn into_movement(self) -> Result<NewMovement, ValidationError> {
        let date = require_text("date", self.date.as_deref())?;
        let date = parse_date("date", &date)?;
        let counterparty_name = require_text("purchaserName", self.purchaser_name.as_deref())?;
        let counterparty_contact =
            require_text("purchaserContact", self.purchaser_contact.as_deref())?;
        let fish_type = require_text("fishType", self.fish_type.as_deref())?;
        expect_kind("type", self.kind.as_deref(), MovementKind::Sale)?;
        let quantity = require_decimal("quantity", self.quantity)?;
        validate_positive("quantity", quantity)?;
        let unit_price = require_decimal("unitPrice", self.unit_price)?;
        validate_non_negative("unitPrice", unit_price)?;
        let total_price = checked_total(quantity, unit_price)?;

        Ok(NewMovement {
            kind: MovementKind::Sale,
            date,
            counterparty_name,
            counterparty_contact,
            fish_type,
            quantity,
            unit_price,
            total_price,
        })
    }
}

impl ListMovementsQuery {
    pub fn into_filter(self) -> Result<MovementFilter, ValidationError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_kind("type", raw)?),
        };
        let limit = validate_limit(self.limit)?;
        Ok(MovementFilter { kind, limit })
    }
}

impl StockService {
    /// Create a new StockService over the given storage handle
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Record an inventory receipt and add it to the fish type's balance
    pub async fn apply_purchase(&self, input: RecordPurchaseInput) -> AppResult<AppliedMovement> {
        let movement = input.into_movement()?;
        let applied = self.store.apply_movement(movement).await?;

        tracing::info!(
            movement_id = applied.movement.id,
            fish_type = %applied.movement.fish_type,
            quantity = %applied.movement.quantity,
            balance = %applied.balance,
            "Purchase recorded"
        );

        Ok(applied)
    }

    /// Record a sale, deducting it from the fish type's balance.
    ///
    /// Fails with `InsufficientStock` carrying the available quantity when
    /// the balance does not cover the request; no partial fulfilment.
    pub async fn apply_sale(&self, input: RecordSaleInput) -> AppResult<AppliedMovement> {
        let movement = input.into_movement()?;
        let fish_type = movement.fish_type.clone();
        let requested = movement.quantity;

        match self.store.apply_movement(movement).await {
            Ok(applied) => {
                tracing::info!(
                    movement_id = applied.movement.id,
                    fish_type = %applied.movement.fish_type,
                    quantity = %applied.movement.quantity,
                    remaining = %applied.balance,
                    "Sale recorded"
                );
                Ok(applied)
            }
            Err(StoreError::InsufficientStock { available }) => {
                tracing::warn!(
                    fish_type = %fish_type,
                    requested = %requested,
                    available = %available,
                    "Sale rejected for insufficient stock"
                );
                Err(AppError::InsufficientStock { available })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Zero every balance. The movement log is left as is.
    pub async fn reset_all_stock(&self) -> AppResult<u64> {
        let reset = self.store.reset_balances().await?;
        tracing::info!(balances = reset, "Stock balances reset");
        Ok(reset)
    }

    /// Balance for a fish type; one never seen reads as zero
    pub async fn get_balance(&self, fish_type: &str) -> AppResult<Decimal> {
        Ok(self
            .store
            .balance(fish_type)
            .await?
            .unwrap_or(Decimal::ZERO))
    }

    /// All balances ordered by fish type
    pub async fn list_balances(&self) -> AppResult<Vec<StockBalance>> {
        Ok(self.store.balances().await?)
    }

    /// Fish types known to the ledger
    pub async fn list_fish_types(&self) -> AppResult<Vec<String>> {
        Ok(self.store.fish_types().await?)
    }

    /// Movement log, optionally filtered by type and limited
    pub async fn list_movements(&self, query: ListMovementsQuery) -> AppResult<Vec<Movement>> {
        let filter = query.into_filter()?;
        Ok(self.store.movements(filter).await?)
    }
}
