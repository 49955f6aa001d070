//! Filter, query and export handlers over a held session

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use claims_engine::{
    DimensionKind, FilterControls, CSV_MIME, FILTERED_EXPORT_FILE_NAME, FULL_EXPORT_FILE_NAME,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::run_blocking;
use crate::error::{api_success, api_success_with_count, ApiError, ApiResponse, ApiResult};
use crate::server::ClaimsServer;

type Record = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(flatten)]
    pub controls: FilterControls,
    /// Preview rows to return; the server default when omitted
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub source_rows: usize,
    pub matched: usize,
    pub rows: Vec<Record>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

/// Apply the claims-view controls and return the count plus a preview
pub async fn filter_session(
    State(server): State<ClaimsServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<FilterRequest>,
) -> ApiResult<Json<ApiResponse<FilterResponse>>> {
    let session = server.get(id)?;
    let limit = request.limit.unwrap_or(server.settings.server.preview_rows);
    info!(
        session_id = %id,
        status = request.controls.status.as_deref().unwrap_or("-"),
        provider_id = %request.controls.provider_id.as_deref().map(|p| server.redactor.redact(p)).unwrap_or_default(),
        "Filtering session"
    );

    let clauses = request.controls.clauses()?;
    let response = run_blocking(move || {
        let filtered = session.filter(&clauses)?;
        Ok(FilterResponse {
            source_rows: session.fact().row_count(),
            matched: filtered.row_count(),
            rows: filtered.head(limit).to_records(),
        })
    })
    .await?;

    Ok(api_success(response))
}

/// Exact-match query: every `column: value` pair must hold
pub async fn query_session(
    State(server): State<ClaimsServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<ApiResponse<Vec<Record>>>> {
    let session = server.get(id)?;
    debug!(session_id = %id, columns = request.filters.len(), "Querying session");

    let rows = run_blocking(move || session.query(&request.filters)).await?;
    let count = rows.len();
    Ok(api_success_with_count(rows, count))
}

/// Filtered CSV download
pub async fn export_session(
    State(server): State<ClaimsServer>,
    Path(id): Path<Uuid>,
    Query(controls): Query<FilterControls>,
) -> ApiResult<Response> {
    let session = server.get(id)?;
    let clauses = controls.clauses()?;
    let file_name = if clauses.is_empty() {
        FULL_EXPORT_FILE_NAME
    } else {
        FILTERED_EXPORT_FILE_NAME
    };

    let bytes = run_blocking(move || session.export(&clauses)).await?;
    info!(session_id = %id, bytes = bytes.len(), file_name, "Exporting session");
    Ok(csv_attachment(bytes, file_name))
}

/// One dimension table of a dimensional session as CSV
pub async fn export_dimension(
    State(server): State<ClaimsServer>,
    Path((id, kind)): Path<(Uuid, String)>,
) -> ApiResult<Response> {
    let kind: DimensionKind = kind
        .parse()
        .map_err(|_| ApiError::not_found(format!("dimension '{kind}'")))?;
    let session = server.get(id)?;
    if session.dimensions().is_none() {
        return Err(ApiError::not_found(format!("dimension '{kind}' for session {id}")));
    }

    let bytes = run_blocking(move || match session.dimension(kind) {
        Some(table) => claims_engine::export::to_csv_bytes(table),
        None => Ok(Vec::new()),
    })
    .await?;
    Ok(csv_attachment(bytes, kind.file_name()))
}

fn csv_attachment(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    )
        .into_response()
}
