//! Upload endpoint configuration schema.
//!
//! Read once at startup and shared read-only by every request afterwards.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub server: ServerConfig,
    pub uploads: UploadsConfig,
    pub cors: CorsConfig,
    pub request_id: RequestIdConfig,
    pub diagnostics: DiagnosticsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Public base URL of this endpoint
    pub endpoint_base: String,
    pub bind_address: String,
    pub port: u16,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadsConfig {
    /// Ceiling for every request body, in bytes
    pub max_content_length: u64,
    /// Ceiling for the size restricted upload route, in bytes
    pub restricted_size_limit: u64,
    /// Allow-list for the MIME restricted upload route
    pub allowed_mime_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

// ---------------------------------------------------------------------------
// Request ID, diagnostics, logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdConfig {
    pub enabled: bool,
    /// Keep a lone inbound ID when it is verifiably unique instead of appending one
    pub trust_single: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}
