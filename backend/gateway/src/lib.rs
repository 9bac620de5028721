//! Upload Endpoint Gateway HTTP Server
//!
//! Upload and meta routes, the request ID middleware, size guards, CORS and
//! the JSON error envelope every failure is rendered as.

pub mod cors;
pub mod errors;
pub mod limits;
pub mod meta;
pub mod request_id;
pub mod server;
pub mod upload;
pub mod uploads;

pub use errors::{ApiError, GatewayError};
pub use request_id::RequestContext;
pub use server::{GatewayState, apply_pipeline, build_router, routes, start_server};
