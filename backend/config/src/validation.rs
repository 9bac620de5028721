//! Config validation: checks run once at startup, before the listener binds.

use crate::schema::EndpointConfig;
use mime::Mime;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &EndpointConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_uploads(config, &mut report);
    validate_cors(config, &mut report);
    validate_diagnostics(config, &mut report);
    report
}

fn validate_server(config: &EndpointConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind_address.parse::<std::net::IpAddr>().is_err() {
        report.error(
            "server.bindAddress",
            format!("'{}' is not an IP address", server.bind_address),
        );
    }
    if !(server.endpoint_base.starts_with("http://") || server.endpoint_base.starts_with("https://"))
    {
        report.warn(
            "server.endpointBase",
            "Endpoint base should be an http(s) URL",
        );
    }
}

fn validate_uploads(config: &EndpointConfig, report: &mut ValidationReport) {
    let uploads = &config.uploads;
    if uploads.max_content_length == 0 {
        report.error("uploads.maxContentLength", "Must be greater than 0");
    }
    if uploads.restricted_size_limit == 0 {
        report.error("uploads.restrictedSizeLimit", "Must be greater than 0");
    }
    if uploads.restricted_size_limit > uploads.max_content_length {
        report.warn(
            "uploads.restrictedSizeLimit",
            "Exceeds maxContentLength; the global ceiling applies first",
        );
    }
    if uploads.allowed_mime_types.is_empty() {
        report.error("uploads.allowedMimeTypes", "At least one MIME type is required");
    }
    for value in &uploads.allowed_mime_types {
        if value.trim().parse::<Mime>().is_err() {
            report.error(
                "uploads.allowedMimeTypes",
                format!("'{value}' is not a valid MIME type"),
            );
        }
    }
}

fn validate_cors(config: &EndpointConfig, report: &mut ValidationReport) {
    let cors = &config.cors;
    if cors.allowed_origins.is_empty() {
        report.error("cors.allowedOrigins", "At least one origin is required");
    }
    if cors.allowed_methods.is_empty() {
        report.error("cors.allowedMethods", "At least one method is required");
    }
    if cors.allows_any_origin() {
        report.warn("cors.allowedOrigins", "Any origin may call this endpoint");
    }
}

fn validate_diagnostics(config: &EndpointConfig, report: &mut ValidationReport) {
    let diagnostics = &config.diagnostics;
    if diagnostics.enabled && diagnostics.capacity == 0 {
        report.error("diagnostics.capacity", "Must be greater than 0 when enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let report = validate(&EndpointConfig::default());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.path == "cors.allowedOrigins"));
    }

    #[test]
    fn zero_ceilings_are_errors() {
        let mut cfg = EndpointConfig::default();
        cfg.uploads.max_content_length = 0;
        cfg.uploads.restricted_size_limit = 0;
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn restricted_ceiling_above_global_is_a_warning() {
        let mut cfg = EndpointConfig::default();
        cfg.uploads.restricted_size_limit = cfg.uploads.max_content_length + 1;
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.path == "uploads.restrictedSizeLimit"));
    }

    #[test]
    fn bad_mime_types_are_errors() {
        let mut cfg = EndpointConfig::default();
        cfg.uploads.allowed_mime_types = vec!["jpeg".into()];
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("jpeg"));

        cfg.uploads.allowed_mime_types.clear();
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn empty_cors_lists_are_errors() {
        let mut cfg = EndpointConfig::default();
        cfg.cors.allowed_origins.clear();
        cfg.cors.allowed_methods.clear();
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let mut cfg = EndpointConfig::default();
        cfg.server.bind_address = "localhost:9000".into();
        assert!(!validate(&cfg).is_valid());
    }
}
