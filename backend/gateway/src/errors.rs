//! Gateway error responses.
//!
//! Every failure leaves the gateway as an [`ApiError`], rendered as the
//! `{"errors": [...]}` envelope with the status of its kind.

use std::any::Any;

use axum::{
    Json,
    extract::{State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use upload_endpoint_core::{ErrorEnvelope, ErrorKind, upload::InvalidMimeType};
use upload_endpoint_logging::DiagnosticEvent;

use crate::request_id::RequestContext;
use crate::server::GatewayState;

/// Errors raised while building the gateway from its config.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid MIME allow-list: {0}")]
    MimeAllowList(#[from] InvalidMimeType),

    #[error("invalid CORS {setting} value \"{value}\"")]
    Cors { setting: &'static str, value: String },
}

/// A terminating response carrying one error object.
#[derive(Debug)]
pub struct ApiError(pub ErrorKind);

impl ApiError {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(self.0))).into_response()
    }
}

impl GatewayState {
    /// Log a failure, forward client errors to diagnostics and wrap it for
    /// the response.
    pub fn reject(&self, ctx: &RequestContext, kind: ErrorKind) -> ApiError {
        let status = kind.status();
        if status.is_server_error() {
            error!(request_id = %ctx.request_id, status = status.as_u16(), "{}", kind.log_message());
        } else {
            warn!(request_id = %ctx.request_id, status = status.as_u16(), "{}", kind.log_message());
        }
        if kind.is_client_input() {
            self.diagnostics.report(DiagnosticEvent::new(
                ctx.request_id.clone(),
                status.as_u16(),
                kind.to_string(),
                kind.log_message(),
            ));
        }
        ApiError(kind)
    }
}

/// Map a multipart read failure. `limit` is the ceiling that was in force
/// for the body.
pub fn classify_multipart_error(err: &MultipartError, limit: u64) -> ErrorKind {
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ErrorKind::too_large(limit, None),
        status if status.is_client_error() => ErrorKind::GenericBadRequest,
        _ => {
            error!(error = %err.body_text(), "Failed to read multipart body");
            ErrorKind::InternalServerError
        }
    }
}

/// Router fallback.
pub async fn not_found(State(state): State<GatewayState>, ctx: RequestContext) -> ApiError {
    state.reject(&ctx, ErrorKind::NotFound)
}

/// `CatchPanicLayer` handler: the panic payload never reaches the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %message, "Handler panicked");
    ApiError(ErrorKind::InternalServerError).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn api_error_uses_kind_status() {
        let response = ApiError(ErrorKind::too_large(40960, Some(44174))).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["status"], 413);
        assert_eq!(
            body["errors"][0]["meta"]["maximum_content_length_allowed"],
            40960
        );
    }

    #[tokio::test]
    async fn panic_handler_hides_payload() {
        let response = handle_panic(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["title"], "Internal Server Error");
        assert!(!body.to_string().contains("secret detail"));
    }
}
