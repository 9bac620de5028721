//! Main HTTP Gateway Server.
//!
//! Routing and the middleware pipeline every request passes through.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{Span, error, info, info_span, instrument};
use upload_endpoint_config::EndpointConfig;
use upload_endpoint_core::{
    MimeAllowList, REQUEST_ID_HEADER, RequestIdPolicy, SingleIdPolicy, UploadConstraints,
};
use upload_endpoint_logging::Diagnostics;

use crate::cors::{build_cors, cors_middleware};
use crate::errors::{GatewayError, handle_panic, not_found};
use crate::limits::content_length_guard;
use crate::request_id::request_id_middleware;
use crate::{meta, uploads};

/// Application state shared across routes. Read-only after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<EndpointConfig>,
    pub request_ids: Arc<RequestIdPolicy>,
    pub allowed_mime_types: Arc<MimeAllowList>,
    pub diagnostics: Diagnostics,
}

impl GatewayState {
    pub fn new(config: EndpointConfig, diagnostics: Diagnostics) -> Result<Self, GatewayError> {
        let allowed_mime_types =
            MimeAllowList::parse(config.uploads.allowed_mime_types.iter().cloned())?;
        let single = if config.request_id.trust_single {
            SingleIdPolicy::TrustVerified
        } else {
            SingleIdPolicy::AlwaysAppend
        };
        let request_ids = RequestIdPolicy::new(single, config.request_id.trusted_marker.clone());
        Ok(Self {
            config: Arc::new(config),
            request_ids: Arc::new(request_ids),
            allowed_mime_types: Arc::new(allowed_mime_types),
            diagnostics,
        })
    }

    pub fn restricted_size_constraints(&self) -> UploadConstraints {
        UploadConstraints::unrestricted()
            .with_max_content_length(self.config.uploads.restricted_size_limit)
    }

    pub fn restricted_mime_constraints(&self) -> UploadConstraints {
        UploadConstraints::unrestricted()
            .with_allowed_mime_types(self.allowed_mime_types.as_ref().clone())
    }
}

fn body_limit(bytes: u64) -> usize {
    usize::try_from(bytes).unwrap_or(usize::MAX)
}

/// Endpoint routes, without the middleware pipeline.
pub fn routes(state: &GatewayState) -> Router<GatewayState> {
    let restricted_limit = body_limit(state.config.uploads.restricted_size_limit);
    Router::new()
        .route("/", get(uploads::index))
        .route("/upload-single", post(uploads::upload_single))
        .route("/upload-multiple", post(uploads::upload_multiple))
        .route(
            "/upload-single-restricted-size",
            post(uploads::upload_single_restricted_size)
                .layer(DefaultBodyLimit::max(restricted_limit)),
        )
        .route(
            "/upload-single-restricted-mime-types",
            post(uploads::upload_single_restricted_mime_types),
        )
        .route(
            "/meta/health/canary",
            get(meta::health_canary).options(meta::health_canary),
        )
        .route(
            "/meta/errors/generic-bad-request",
            get(meta::generic_bad_request),
        )
        .route(
            "/meta/errors/generic-internal-server-error",
            get(meta::generic_internal_server_error),
        )
        .route(
            "/meta/logging/entries/:logging_level",
            post(meta::logging_entry),
        )
        .fallback(not_found)
}

fn make_request_span(req: &Request) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    )
}

/// Wrap `router` in the request pipeline, outermost first: request ID,
/// tracing, CORS, panic recovery, declared length guard, body limit.
pub fn apply_pipeline(
    router: Router<GatewayState>,
    state: GatewayState,
) -> Result<Router, GatewayError> {
    let cors = build_cors(&state.config.cors)?;
    let router = router
        .layer(DefaultBodyLimit::max(body_limit(
            state.config.uploads.max_content_length,
        )))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            content_length_guard,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span));

    let router = if state.config.request_id.enabled {
        router.layer(middleware::from_fn_with_state(
            state.clone(),
            request_id_middleware,
        ))
    } else {
        router
    };
    Ok(router.with_state(state))
}

pub fn build_router(state: GatewayState) -> Result<Router, GatewayError> {
    let router = routes(&state);
    apply_pipeline(router, state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state)?;

    info!("Upload endpoint listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Upload endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
