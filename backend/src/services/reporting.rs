//! Reporting service for sales analytics and data export
//! Provides the sales summary, per-fish breakdown and monthly trend

use std::sync::Arc;

use serde::Serialize;
use shared::models::{FishSales, SalesSummary, TrendPoint};

use crate::error::{AppError, AppResult};
use crate::store::LedgerStore;

/// Reporting service. Read-only; every figure is recomputed on each call.
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn LedgerStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Sales and purchase totals, profit and movement count
    pub async fn sales_summary(&self) -> AppResult<SalesSummary> {
        Ok(self.store.sales_summary().await?)
    }

    /// Sales quantity and value per fish type
    pub async fn sales_by_fish_type(&self) -> AppResult<Vec<FishSales>> {
        Ok(self.store.sales_by_fish_type().await?)
    }

    /// Sparse per-month sales and purchase series
    pub async fn monthly_trend(&self) -> AppResult<Vec<TrendPoint>> {
        Ok(self.store.monthly_trend().await?)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
