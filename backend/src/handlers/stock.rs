//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Movement, MovementKind, StockBalance};

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::services::stock::{
    ListMovementsQuery, RecordPurchaseInput, RecordSaleInput, StockService,
};
use crate::AppState;

/// Response for a recorded purchase
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Response for a recorded sale
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_stock: Decimal,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Balance row as exposed to clients
#[derive(Debug, Serialize)]
pub struct BalanceView {
    pub fish_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

impl From<StockBalance> for BalanceView {
    fn from(balance: StockBalance) -> Self {
        Self {
            fish_type: balance.fish_type,
            quantity: balance.quantity,
        }
    }
}

/// Movement log entry as exposed to clients.
///
/// Counterparty details and the server timestamp are only included in the
/// unfiltered listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub fish_type: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl MovementRecord {
    fn full(m: Movement) -> Self {
        Self {
            id: m.id,
            date: m.date,
            fish_type: m.fish_type,
            kind: m.kind,
            quantity: m.quantity,
            unit_price: m.unit_price,
            total_price: m.total_price,
            counterparty_name: Some(m.counterparty_name),
            counterparty_contact: Some(m.counterparty_contact),
            recorded_at: Some(m.recorded_at),
        }
    }

    fn brief(m: Movement) -> Self {
        Self {
            counterparty_name: None,
            counterparty_contact: None,
            recorded_at: None,
            ..Self::full(m)
        }
    }
}

/// Record an inventory receipt
pub async fn record_purchase(
    State(state): State<AppState>,
    AppJson(input): AppJson<RecordPurchaseInput>,
) -> AppResult<Json<PurchaseResponse>> {
    let service = StockService::new(state.store);
    let applied = service.apply_purchase(input).await?;
    Ok(Json(PurchaseResponse {
        success: true,
        message: "Inventory saved!".to_string(),
        id: applied.movement.id,
        balance: applied.balance,
    }))
}

/// Record a sale
pub async fn record_sale(
    State(state): State<AppState>,
    AppJson(input): AppJson<RecordSaleInput>,
) -> AppResult<Json<SaleResponse>> {
    let service = StockService::new(state.store);
    let applied = service.apply_sale(input).await?;
    Ok(Json(SaleResponse {
        success: true,
        message: "Sale recorded successfully!".to_string(),
        id: applied.movement.id,
        total_price: applied.movement.total_price,
        remaining_stock: applied.balance,
    }))
}

/// List movements, optionally filtered by type and limited
pub async fn list_movements(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListMovementsQuery>,
) -> AppResult<Json<Vec<MovementRecord>>> {
    let filtered = query.kind.as_deref().is_some_and(|k| !k.trim().is_empty());
    let service = StockService::new(state.store);
    let movements = service.list_movements(query).await?;

    let view = if filtered {
        MovementRecord::brief
    } else {
        MovementRecord::full
    };
    Ok(Json(movements.into_iter().map(view).collect()))
}

/// Get all balances
pub async fn get_balances(State(state): State<AppState>) -> AppResult<Json<Vec<BalanceView>>> {
    let service = StockService::new(state.store);
    let balances = service.list_balances().await?;
    Ok(Json(balances.into_iter().map(BalanceView::from).collect()))
}

/// Get the balance for a single fish type
pub async fn get_balance(
    State(state): State<AppState>,
    Path(fish_type): Path<String>,
) -> AppResult<Json<BalanceView>> {
    let service = StockService::new(state.store);
    let quantity = service.get_balance(&fish_type).await?;
    Ok(Json(BalanceView {
        fish_type,
        quantity,
    }))
}

/// Reset all balances to zero
pub async fn reset_stock(State(state): State<AppState>) -> AppResult<Json<SuccessResponse>> {
    let service = StockService::new(state.store);
    service.reset_all_stock().await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// List fish types for selection inputs
pub async fn list_fish_types(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let service = StockService::new(state.store);
    let types = service.list_fish_types().await?;
    Ok(Json(types))
}
