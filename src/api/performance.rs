//! Student performance API endpoints.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{success, ApiResponse, ApiResult, AppJson, DeleteResult};
use crate::errors::{AppError, ErrorResponse};
use crate::models::{CreatePerformanceRequest, StudentPerformance, UpdatePerformanceRequest};
use crate::performance::{parse_performance_csv, PerformanceView, RejectedLine, ALL_YEARS, FORMAT_HINT};
use crate::AppState;

/// Query parameters for the performance page view.
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// "All", "upcoming" or a four-digit year
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// Outcome of a CSV import.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: Vec<RejectedLine>,
}

/// GET /api/performance - All records, year descending.
pub async fn list_performance(State(state): State<AppState>) -> ApiResult<Vec<StudentPerformance>> {
    let records = state.repo.list_performance().await?;
    success(records)
}

/// GET /api/performance/view - Filtered records plus page metadata.
pub async fn performance_view(
    State(state): State<AppState>,
    Query(params): Query<ViewQuery>,
) -> ApiResult<PerformanceView> {
    let records = state.repo.list_performance().await?;
    let selected_year = params
        .year
        .filter(|y| !y.trim().is_empty())
        .unwrap_or_else(|| ALL_YEARS.to_string());
    let search = params.q.unwrap_or_default();
    let current_year = chrono::Local::now().year();

    success(PerformanceView::build(
        &records,
        &selected_year,
        &search,
        current_year,
    ))
}

/// POST /api/admin/performance - Add one record.
pub async fn create_performance(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePerformanceRequest>,
) -> ApiResult<StudentPerformance> {
    let record = StudentPerformance::from_request(request)?;
    state.repo.add_performance(record.clone()).await?;
    success(record)
}

/// PUT /api/admin/performance/{id} - Edit a record in place.
pub async fn update_performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdatePerformanceRequest>,
) -> ApiResult<StudentPerformance> {
    let existing = state
        .repo
        .get_performance(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;

    let updated = existing.apply(request)?;
    if !state.repo.update_performance(updated.clone()).await? {
        return Err(AppError::NotFound(format!("Record {} not found", id)));
    }
    success(updated)
}

/// DELETE /api/admin/performance/{id} - Remove a record.
pub async fn delete_performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResult> {
    let deleted = state.repo.delete_performance(&id).await?;
    success(DeleteResult { deleted })
}

/// POST /api/admin/performance/import - Bulk import from a raw CSV body.
pub async fn import_performance(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, AppError> {
    let import = parse_performance_csv(&body);

    if import.accepted() == 0 {
        tracing::warn!(rejected = import.rejected.len(), "CSV import produced no records");
        let error = AppError::Validation(FORMAT_HINT.to_string());
        let response = ErrorResponse::new(&error)
            .with_details(serde_json::json!({ "rejected": import.rejected }));
        return Ok((error.status_code(), Json(response)).into_response());
    }

    let imported = import.accepted();
    state.repo.bulk_add_performance(import.records).await?;
    tracing::info!(imported, rejected = import.rejected.len(), "CSV import complete");

    Ok(ApiResponse::new(ImportSummary {
        imported,
        rejected: import.rejected,
    })
    .into_response())
}
