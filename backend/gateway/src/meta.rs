//! Meta endpoints: health check, simulated failures, log entries.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};
use serde_json::Value;
use upload_endpoint_core::{ErrorKind, FieldLocation, FieldViolation};
use upload_endpoint_logging::LogLevel;

use crate::errors::ApiError;
use crate::request_id::RequestContext;
use crate::server::GatewayState;

/// Handler for `GET|OPTIONS /meta/health/canary`
///
/// The service has no dependencies, so reaching this handler means healthy.
pub async fn health_canary() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Handler for `GET /meta/errors/generic-bad-request`
pub async fn generic_bad_request(
    State(state): State<GatewayState>,
    ctx: RequestContext,
) -> ApiError {
    state.reject(&ctx, ErrorKind::GenericBadRequest)
}

/// Handler for `GET /meta/errors/generic-internal-server-error`
pub async fn generic_internal_server_error(
    State(state): State<GatewayState>,
    ctx: RequestContext,
) -> ApiError {
    state.reject(&ctx, ErrorKind::InternalServerError)
}

/// Handler for `POST /meta/logging/entries/:logging_level`
pub async fn logging_entry(
    State(state): State<GatewayState>,
    ctx: RequestContext,
    logging_level: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(logging_level) =
        logging_level.map_err(|_| state.reject(&ctx, ErrorKind::GenericBadRequest))?;
    let level = logging_level.parse::<LogLevel>().map_err(|_| {
        state.reject(
            &ctx,
            ErrorKind::FieldValidation(FieldViolation {
                location: FieldLocation::Parameter,
                field: "logging_level".to_string(),
                invalid_value: Value::String(logging_level.clone()),
                allowed_values: Some(LogLevel::names()),
            }),
        )
    })?;
    level.emit_test_entry();
    Ok(StatusCode::ACCEPTED)
}
