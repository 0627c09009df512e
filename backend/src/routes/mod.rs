//! Route definitions for the fish ledger

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Movements
        .route(
            "/inventory",
            get(handlers::list_movements).post(handlers::record_purchase),
        )
        .route("/salesRecord", post(handlers::record_sale))
        // Balances
        .nest("/stock", stock_routes())
        .route("/fish-types", get(handlers::list_fish_types))
        // Reports
        .nest("/sales", report_routes())
}

/// Stock balance routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_balances))
        .route("/reset", post(handlers::reset_stock))
        .route("/:fish_type", get(handlers::get_balance))
}

/// Sales reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_sales_summary))
        .route("/by-fish", get(handlers::get_sales_by_fish))
        .route("/monthly-trend", get(handlers::get_monthly_trend))
}
