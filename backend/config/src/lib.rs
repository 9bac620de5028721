//! `upload-endpoint-config` — runtime configuration for the upload endpoint.
//!
//! Provides:
//! - Typed config schema
//! - Environment variable loading
//! - Default values
//! - Startup validation

pub mod defaults;
pub mod env;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use env::{from_env, from_env_with, InvalidEnvVarError};
pub use schema::{
    CorsConfig, DiagnosticsConfig, EndpointConfig, LoggingConfig, RequestIdConfig, ServerConfig,
    UploadsConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;

/// Load the config from the process environment and validate it.
///
/// This is the main entry point for loading a config at runtime.
pub fn load() -> Result<EndpointConfig> {
    load_with(&std::env::vars().collect())
}

/// Same as [`load`], reading from the provided map.
pub fn load_with(vars: &HashMap<String, String>) -> Result<EndpointConfig> {
    let config = from_env_with(vars).context("Failed to read config from environment")?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!(
            "{} config error(s), first: {}",
            report.errors.len(),
            first
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_with_rejects_invalid_config() {
        let vars = HashMap::from([(env::MAX_CONTENT_LENGTH.to_string(), "0".to_string())]);
        let err = load_with(&vars).unwrap_err();
        assert!(err.to_string().contains("uploads.maxContentLength"));
    }

    #[test]
    fn load_with_reports_bad_variable() {
        let vars = HashMap::from([(env::PORT.to_string(), "ninety".to_string())]);
        let err = load_with(&vars).unwrap_err();
        assert!(format!("{err:#}").contains(env::PORT));
    }

    #[test]
    fn load_with_accepts_defaults() {
        let cfg = load_with(&HashMap::new()).unwrap();
        assert_eq!(cfg.server.port, 9000);
    }
}
