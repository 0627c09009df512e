//! Business logic services for the fish ledger

pub mod reporting;
pub mod stock;

pub use reporting::ReportingService;
pub use stock::StockService;
