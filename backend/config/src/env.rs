//! Load configuration from environment variables.
//!
//! Unset or empty variables keep their defaults. Lists are comma separated.

use std::collections::HashMap;
use std::str::FromStr;

use crate::schema::EndpointConfig;

pub const ENDPOINT_BASE: &str = "APP_ENDPOINT_BASE";
pub const BIND: &str = "UPLOAD_ENDPOINT_BIND";
pub const PORT: &str = "UPLOAD_ENDPOINT_PORT";
pub const MAX_CONTENT_LENGTH: &str = "UPLOAD_ENDPOINT_MAX_CONTENT_LENGTH";
pub const RESTRICTED_SIZE_LIMIT: &str = "UPLOAD_ENDPOINT_RESTRICTED_SIZE_LIMIT";
pub const ALLOWED_MIME_TYPES: &str = "UPLOAD_ENDPOINT_ALLOWED_MIME_TYPES";
pub const CORS_ORIGINS: &str = "UPLOAD_ENDPOINT_CORS_ORIGINS";
pub const CORS_METHODS: &str = "UPLOAD_ENDPOINT_CORS_METHODS";
pub const CORS_HEADERS: &str = "UPLOAD_ENDPOINT_CORS_HEADERS";
pub const REQUEST_ID: &str = "UPLOAD_ENDPOINT_REQUEST_ID";
pub const REQUEST_ID_TRUST_SINGLE: &str = "UPLOAD_ENDPOINT_REQUEST_ID_TRUST_SINGLE";
pub const REQUEST_ID_TRUSTED_MARKER: &str = "UPLOAD_ENDPOINT_REQUEST_ID_TRUSTED_MARKER";
pub const DIAGNOSTICS: &str = "UPLOAD_ENDPOINT_DIAGNOSTICS";
pub const DIAGNOSTICS_CAPACITY: &str = "UPLOAD_ENDPOINT_DIAGNOSTICS_CAPACITY";
pub const LOG_LEVEL: &str = "UPLOAD_ENDPOINT_LOG_LEVEL";
pub const LOG_JSON: &str = "UPLOAD_ENDPOINT_LOG_JSON";
pub const LOG_DIR: &str = "UPLOAD_ENDPOINT_LOG_DIR";

/// Error returned for a variable whose value cannot be used.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value \"{value}\" for env var \"{var_name}\": expected {expected}")]
pub struct InvalidEnvVarError {
    pub var_name: String,
    pub value: String,
    pub expected: &'static str,
}

/// Build the config from the process environment.
pub fn from_env() -> Result<EndpointConfig, InvalidEnvVarError> {
    from_env_with(&std::env::vars().collect())
}

/// Build the config from a provided map (useful for testing).
pub fn from_env_with(env: &HashMap<String, String>) -> Result<EndpointConfig, InvalidEnvVarError> {
    let vars = Vars(env);
    let mut config = EndpointConfig::default();

    let server = &mut config.server;
    vars.string(ENDPOINT_BASE, &mut server.endpoint_base);
    vars.string(BIND, &mut server.bind_address);
    vars.parsed(PORT, "a port number", &mut server.port)?;

    let uploads = &mut config.uploads;
    vars.parsed(MAX_CONTENT_LENGTH, "a byte count", &mut uploads.max_content_length)?;
    vars.parsed(
        RESTRICTED_SIZE_LIMIT,
        "a byte count",
        &mut uploads.restricted_size_limit,
    )?;
    vars.list(ALLOWED_MIME_TYPES, &mut uploads.allowed_mime_types);

    let cors = &mut config.cors;
    vars.list(CORS_ORIGINS, &mut cors.allowed_origins);
    vars.list(CORS_METHODS, &mut cors.allowed_methods);
    vars.list(CORS_HEADERS, &mut cors.allowed_headers);

    let request_id = &mut config.request_id;
    vars.flag(REQUEST_ID, &mut request_id.enabled)?;
    vars.flag(REQUEST_ID_TRUST_SINGLE, &mut request_id.trust_single)?;
    request_id.trusted_marker = vars.get(REQUEST_ID_TRUSTED_MARKER).map(str::to_string);

    let diagnostics = &mut config.diagnostics;
    vars.flag(DIAGNOSTICS, &mut diagnostics.enabled)?;
    vars.parsed(
        DIAGNOSTICS_CAPACITY,
        "a channel capacity",
        &mut diagnostics.capacity,
    )?;

    let logging = &mut config.logging;
    vars.string(LOG_LEVEL, &mut logging.level);
    vars.flag(LOG_JSON, &mut logging.json)?;
    logging.log_dir = vars.get(LOG_DIR).map(str::to_string);

    Ok(config)
}

struct Vars<'a>(&'a HashMap<String, String>);

impl Vars<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, name: &str, target: &mut String) {
        if let Some(value) = self.get(name) {
            *target = value.to_string();
        }
    }

    fn list(&self, name: &str, target: &mut Vec<String>) {
        if let Some(value) = self.get(name) {
            *target = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    fn parsed<T: FromStr>(
        &self,
        name: &str,
        expected: &'static str,
        target: &mut T,
    ) -> Result<(), InvalidEnvVarError> {
        let Some(value) = self.get(name) else {
            return Ok(());
        };
        *target = value.parse().map_err(|_| invalid(name, value, expected))?;
        Ok(())
    }

    fn flag(&self, name: &str, target: &mut bool) -> Result<(), InvalidEnvVarError> {
        let Some(value) = self.get(name) else {
            return Ok(());
        };
        *target = match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => return Err(invalid(name, value, "a boolean")),
        };
        Ok(())
    }
}

fn invalid(name: &str, value: &str, expected: &'static str) -> InvalidEnvVarError {
    InvalidEnvVarError {
        var_name: name.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = from_env_with(&HashMap::new()).unwrap();
        assert_eq!(cfg, EndpointConfig::default());
    }

    #[test]
    fn reads_limits_and_lists() {
        let cfg = from_env_with(&env(&[
            (RESTRICTED_SIZE_LIMIT, "1024"),
            (ALLOWED_MIME_TYPES, "image/jpeg, image/png"),
            (CORS_ORIGINS, "https://a.example,https://b.example"),
        ]))
        .unwrap();
        assert_eq!(cfg.uploads.restricted_size_limit, 1024);
        assert_eq!(cfg.uploads.allowed_mime_types, vec!["image/jpeg", "image/png"]);
        assert_eq!(cfg.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn reads_flags() {
        let cfg = from_env_with(&env(&[
            (REQUEST_ID, "off"),
            (DIAGNOSTICS, "TRUE"),
            (REQUEST_ID_TRUSTED_MARKER, "LB-RV1"),
        ]))
        .unwrap();
        assert!(!cfg.request_id.enabled);
        assert!(cfg.diagnostics.enabled);
        assert_eq!(cfg.request_id.trusted_marker.as_deref(), Some("LB-RV1"));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let cfg = from_env_with(&env(&[(PORT, "  "), (LOG_DIR, "")])).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.logging.log_dir, None);
    }

    #[test]
    fn error_names_the_variable() {
        let err = from_env_with(&env(&[(MAX_CONTENT_LENGTH, "ten megabytes")])).unwrap_err();
        assert_eq!(err.var_name, MAX_CONTENT_LENGTH);
        assert!(err.to_string().contains("ten megabytes"));

        let err = from_env_with(&env(&[(LOG_JSON, "maybe")])).unwrap_err();
        assert_eq!(err.expected, "a boolean");
    }
}
