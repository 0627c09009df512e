//! HTTP handlers for the fish ledger API

pub mod health;
pub mod reporting;
pub mod stock;

pub use health::health_check;
pub use reporting::{get_monthly_trend, get_sales_by_fish, get_sales_summary};
pub use stock::{
    get_balance, get_balances, list_fish_types, list_movements, record_purchase, record_sale,
    reset_stock,
};
