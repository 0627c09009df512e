//! Reporting handlers for sales analytics and data export

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::models::{SalesSummary, TrendPoint};

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::services::reporting::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get the sales summary
pub async fn get_sales_summary(State(state): State<AppState>) -> AppResult<Json<SalesSummary>> {
    let service = ReportingService::new(state.store);
    let summary = service.sales_summary().await?;
    Ok(Json(summary))
}

/// Get sales broken down by fish type
pub async fn get_sales_by_fish(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.store);
    let data = service.sales_by_fish_type().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sales_by_fish.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Get the monthly sales and purchase trend
pub async fn get_monthly_trend(State(state): State<AppState>) -> AppResult<Json<Vec<TrendPoint>>> {
    let service = ReportingService::new(state.store);
    let trend = service.monthly_trend().await?;
    Ok(Json(trend))
}
