//! CORS policy from config.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, header::ACCESS_CONTROL_REQUEST_METHOD},
    middleware::Next,
    response::Response,
};
use tower::{Layer, ServiceExt};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use upload_endpoint_config::CorsConfig;
use upload_endpoint_core::REQUEST_ID_HEADER;

use crate::errors::GatewayError;

/// Build the CORS layer. `X-Request-ID` is always exposed to browsers.
pub fn build_cors(config: &CorsConfig) -> Result<CorsLayer, GatewayError> {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let list = config
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| GatewayError::Cors {
                    setting: "origin",
                    value: o.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(list)
    };

    let methods = config
        .allowed_methods
        .iter()
        .map(|m| {
            Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
                GatewayError::Cors {
                    setting: "method",
                    value: m.clone(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let headers = config
        .allowed_headers
        .iter()
        .map(|h| {
            HeaderName::from_bytes(h.trim().to_ascii_lowercase().as_bytes()).map_err(|_| {
                GatewayError::Cors {
                    setting: "header",
                    value: h.clone(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);
    Ok(if headers.is_empty() {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers(headers)
    })
}

/// A bare `OPTIONS` (no `Access-Control-Request-Method`) is not a preflight
/// and goes to the route instead of being answered by the CORS layer.
fn is_bare_options(req: &Request) -> bool {
    req.method() == Method::OPTIONS && !req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Apply `cors` to every request except bare `OPTIONS`.
pub async fn cors_middleware(State(cors): State<CorsLayer>, req: Request, next: Next) -> Response {
    if is_bare_options(&req) {
        return next.run(req).await;
    }
    match cors.layer(next).oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
