use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use claims_engine::{Session, SessionSummary, Variant};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::run_blocking;
use crate::error::{api_success, ApiError, ApiResponse, ApiResult};
use crate::server::ClaimsServer;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Preset name; the configured default variant when omitted
    pub variant: Option<String>,
    /// Row count; the configured or preset default when omitted
    pub rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

/// Generate a dataset and hold it in a new session
pub async fn create_session(
    State(server): State<ClaimsServer>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SessionSummary>>)> {
    let generator = &server.settings.generator;
    let variant = match request.variant.as_deref() {
        Some(name) => name.parse::<Variant>()?,
        None => generator.variant,
    };
    let config = generator.config_for(variant);
    let rows = generator.rows_for(variant, request.rows);
    config.rows.check(rows)?;
    let slot = server.reserve()?;

    info!(%variant, rows, "Generating session dataset");
    let session = run_blocking(move || Session::generate(config, rows)).await?;
    let session = server.insert(slot, session);

    Ok((StatusCode::CREATED, api_success(session.summary())))
}

/// Ingest an uploaded CSV or JSON body into a new session
pub async fn upload_session(
    State(server): State<ClaimsServer>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiResponse<SessionSummary>>)> {
    if body.is_empty() {
        return Err(ApiError::bad_request("upload body is empty"));
    }
    let slot = server.reserve()?;

    info!(
        filename = %server.redactor.redact(&params.filename),
        bytes = body.len(),
        "Ingesting upload"
    );
    let filename = params.filename;
    let session = run_blocking(move || Session::from_upload(&filename, &body)).await?;
    let session = server.insert(slot, session);

    Ok((StatusCode::CREATED, api_success(session.summary())))
}

pub async fn get_session(
    State(server): State<ClaimsServer>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<SessionSummary>>> {
    let session = server.get(id)?;
    Ok(api_success(session.summary()))
}

pub async fn delete_session(State(server): State<ClaimsServer>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    server.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
