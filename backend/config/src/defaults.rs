//! Config defaults.

use crate::schema::{
    CorsConfig, DiagnosticsConfig, LoggingConfig, RequestIdConfig, ServerConfig, UploadsConfig,
};

pub const DEFAULT_ENDPOINT_BASE: &str = "http://localhost:9000";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 9000;

/// 10 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 10 * 1024 * 1024;

/// 40 KiB.
pub const DEFAULT_RESTRICTED_SIZE_LIMIT: u64 = 40 * 1024;

pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg"];

pub const DEFAULT_CORS_ORIGINS: &[&str] = &["*"];

pub const DEFAULT_CORS_METHODS: &[&str] = &["GET", "POST", "OPTIONS"];

pub const DEFAULT_CORS_HEADERS: &[&str] = &["content-type", "x-request-id"];

pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

pub const DEFAULT_LOG_LEVEL: &str = "info";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            restricted_size_limit: DEFAULT_RESTRICTED_SIZE_LIMIT,
            allowed_mime_types: strings(DEFAULT_ALLOWED_MIME_TYPES),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: strings(DEFAULT_CORS_ORIGINS),
            allowed_methods: strings(DEFAULT_CORS_METHODS),
            allowed_headers: strings(DEFAULT_CORS_HEADERS),
        }
    }
}

impl Default for RequestIdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trust_single: false,
            trusted_marker: None,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::EndpointConfig;

    use super::*;

    #[test]
    fn default_limits_match_fixture_expectations() {
        let cfg = EndpointConfig::default();
        assert_eq!(cfg.uploads.restricted_size_limit, 40960);
        assert_eq!(cfg.uploads.max_content_length, 10_485_760);
        assert_eq!(cfg.uploads.allowed_mime_types, vec!["image/jpeg"]);
    }

    #[test]
    fn request_ids_on_and_diagnostics_off_by_default() {
        let cfg = EndpointConfig::default();
        assert!(cfg.request_id.enabled);
        assert!(!cfg.request_id.trust_single);
        assert!(!cfg.diagnostics.enabled);
        assert!(cfg.cors.allows_any_origin());
    }
}
