//! Request size limits.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use upload_endpoint_core::check_declared_length;

use crate::request_id::RequestContext;
use crate::server::GatewayState;

/// Length the client declared in `Content-Length`, if readable.
pub fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Rejects a request declaring more than the global ceiling before routing.
pub async fn content_length_guard(
    State(state): State<GatewayState>,
    req: Request,
    next: Next,
) -> Response {
    let limit = state.config.uploads.max_content_length;
    if let Err(kind) = check_declared_length(declared_content_length(req.headers()), limit) {
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::generated);
        return state.reject(&ctx, kind).into_response();
    }
    next.run(req).await
}
