//! Request ID middleware
//!
//! Resolves `X-Request-ID` before anything else runs, exposes it to handlers
//! as a [`RequestContext`] and copies it onto every response.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use upload_endpoint_core::{REQUEST_ID_HEADER, generate_request_id};

use crate::server::GatewayState;

/// Correlation data for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Context for a request that did not pass through the middleware.
    pub fn generated() -> Self {
        Self {
            request_id: generate_request_id(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::generated))
    }
}

/// Inbound header lines joined with `,`. Unreadable values count as absent.
fn inbound_request_id(headers: &HeaderMap) -> Option<String> {
    let values = headers
        .get_all(REQUEST_ID_HEADER)
        .iter()
        .map(|v| v.to_str().ok())
        .collect::<Option<Vec<_>>>()?;
    if values.is_empty() {
        return None;
    }
    Some(values.join(","))
}

pub async fn request_id_middleware(
    State(state): State<GatewayState>,
    mut req: Request,
    next: Next,
) -> Response {
    let inbound = inbound_request_id(req.headers());
    let resolved = state.request_ids.resolve(inbound.as_deref());
    let (request_id, header) = match HeaderValue::from_str(&resolved) {
        Ok(header) => (resolved, header),
        Err(_) => {
            let fresh = generate_request_id();
            let header = HeaderValue::from_str(&fresh)
                .unwrap_or_else(|_| HeaderValue::from_static("invalid"));
            (fresh, header)
        }
    };

    req.headers_mut().insert(REQUEST_ID_HEADER, header.clone());
    req.extensions_mut().insert(RequestContext { request_id });

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header);
    response
}
