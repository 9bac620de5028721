//! Upload endpoints. Accepted files are discarded.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Value, json};
use tracing::debug;
use upload_endpoint_core::{UploadConstraints, UploadedFile, check_declared_length};

use crate::errors::ApiError;
use crate::limits::declared_content_length;
use crate::request_id::RequestContext;
use crate::server::GatewayState;
use crate::upload::{validate_multiple, validate_single};

pub const SINGLE_FILE_FIELD: &str = "file";

pub const INDEX_SUMMARY: &str =
    "Simple form action endpoint for testing file upload components in the BAS Style Kit.";

/// Handler for `GET /`
pub async fn index(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "meta": { "summary": INDEX_SUMMARY },
        "links": { "self": state.config.server.endpoint_base },
    }))
}

fn accepted(ctx: &RequestContext, files: &[UploadedFile]) -> StatusCode {
    for file in files {
        debug!(
            request_id = %ctx.request_id,
            field = %file.field_name,
            file_name = %file.file_name,
            content_type = %file.effective_content_type(),
            size = file.size(),
            "Upload accepted"
        );
    }
    StatusCode::NO_CONTENT
}

/// Handler for `POST /upload-single`
pub async fn upload_single(
    State(state): State<GatewayState>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let limit = state.config.uploads.max_content_length;
    let file = validate_single(
        multipart,
        SINGLE_FILE_FIELD,
        &UploadConstraints::unrestricted(),
        limit,
    )
    .await
    .map_err(|kind| state.reject(&ctx, kind))?;
    Ok(accepted(&ctx, &[file]))
}

/// Handler for `POST /upload-multiple`
pub async fn upload_multiple(
    State(state): State<GatewayState>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let limit = state.config.uploads.max_content_length;
    let files = validate_multiple(multipart, &UploadConstraints::unrestricted(), limit)
        .await
        .map_err(|kind| state.reject(&ctx, kind))?;
    Ok(accepted(&ctx, &files))
}

/// Handler for `POST /upload-single-restricted-size`
///
/// The declared length is checked before the body is read.
pub async fn upload_single_restricted_size(
    State(state): State<GatewayState>,
    ctx: RequestContext,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let constraints = state.restricted_size_constraints();
    let limit = constraints
        .max_content_length
        .unwrap_or(state.config.uploads.max_content_length);
    check_declared_length(declared_content_length(&headers), limit)
        .map_err(|kind| state.reject(&ctx, kind))?;

    let file = validate_single(multipart, SINGLE_FILE_FIELD, &constraints, limit)
        .await
        .map_err(|kind| state.reject(&ctx, kind))?;
    Ok(accepted(&ctx, &[file]))
}

/// Handler for `POST /upload-single-restricted-mime-types`
pub async fn upload_single_restricted_mime_types(
    State(state): State<GatewayState>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let limit = state.config.uploads.max_content_length;
    let file = validate_single(
        multipart,
        SINGLE_FILE_FIELD,
        &state.restricted_mime_constraints(),
        limit,
    )
    .await
    .map_err(|kind| state.reject(&ctx, kind))?;
    Ok(accepted(&ctx, &[file]))
}
