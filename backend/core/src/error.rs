//! JSON-API style error objects.
//!
//! Every failure the endpoint can report is one [`ErrorKind`] variant. An
//! [`ErrorObject`] is built from a kind at the moment a check fails and is
//! serialized straight into an [`ErrorEnvelope`].

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// HTTP statuses an error object can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    PayloadTooLarge,
    UnsupportedMediaType,
    InternalServerError,
}

impl ErrorStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::NotFound => 404,
            ErrorStatus::PayloadTooLarge => 413,
            ErrorStatus::UnsupportedMediaType => 415,
            ErrorStatus::InternalServerError => 500,
        }
    }

    pub fn is_server_error(self) -> bool {
        self.as_u16() >= 500
    }
}

impl Serialize for ErrorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Where an invalid request value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    Parameter,
    Query,
    Header,
    Body,
}

impl FieldLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldLocation::Parameter => "parameter",
            FieldLocation::Query => "query",
            FieldLocation::Header => "header",
            FieldLocation::Body => "body",
        }
    }
}

impl std::fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request value that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub location: FieldLocation,
    pub field: String,
    pub invalid_value: serde_json::Value,
    pub allowed_values: Option<Vec<String>>,
}

/// Serialized as `{"<location>": "<field>", "invalid_value": .., "allowed_values": [..]}`.
impl Serialize for FieldViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.allowed_values.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.location.as_str(), &self.field)?;
        map.serialize_entry("invalid_value", &self.invalid_value)?;
        if let Some(allowed) = &self.allowed_values {
            map.serialize_entry("allowed_values", allowed)?;
        }
        map.end()
    }
}

/// Every failure the endpoint reports. `Display` is the error title.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("[{field}] field missing in request")]
    MissingField { field: String },

    #[error("[{field}] field value is an empty selection")]
    EmptySelection { field: String },

    #[error("Request content length is too great")]
    TooLarge {
        maximum_content_length_allowed: u64,
        request_content_length: Option<u64>,
    },

    #[error("File type uploaded is not allowed")]
    UnsupportedMimeType {
        allowed_mime_types: Vec<String>,
        instance_mime_type: String,
    },

    #[error("Request validation error")]
    FieldValidation(FieldViolation),

    #[error("Bad Request")]
    GenericBadRequest,

    #[error("Not Found")]
    NotFound,

    #[error("Internal Server Error")]
    InternalServerError,
}

impl ErrorKind {
    pub fn missing_field(field: impl Into<String>) -> Self {
        ErrorKind::MissingField { field: field.into() }
    }

    pub fn empty_selection(field: impl Into<String>) -> Self {
        ErrorKind::EmptySelection { field: field.into() }
    }

    pub fn too_large(maximum: u64, request: Option<u64>) -> Self {
        ErrorKind::TooLarge {
            maximum_content_length_allowed: maximum,
            request_content_length: request,
        }
    }

    pub fn unsupported_mime_type(allowed: Vec<String>, instance: impl Into<String>) -> Self {
        ErrorKind::UnsupportedMimeType {
            allowed_mime_types: allowed,
            instance_mime_type: instance.into(),
        }
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            ErrorKind::MissingField { .. }
            | ErrorKind::EmptySelection { .. }
            | ErrorKind::FieldValidation(_)
            | ErrorKind::GenericBadRequest => ErrorStatus::BadRequest,
            ErrorKind::TooLarge { .. } => ErrorStatus::PayloadTooLarge,
            ErrorKind::UnsupportedMimeType { .. } => ErrorStatus::UnsupportedMediaType,
            ErrorKind::NotFound => ErrorStatus::NotFound,
            ErrorKind::InternalServerError => ErrorStatus::InternalServerError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ErrorKind::MissingField { .. } => {
                "Check the name of the field and that the request uses multipart/form-data encoding"
                    .to_string()
            }
            ErrorKind::EmptySelection { .. } => {
                "Check the file selected is specified correctly and is a valid file".to_string()
            }
            ErrorKind::TooLarge { .. } => {
                "Check the content length of the request is less than the maximum allowed"
                    .to_string()
            }
            ErrorKind::UnsupportedMimeType { .. } => {
                "Check the file mime_type is in the list of allowed types".to_string()
            }
            ErrorKind::FieldValidation(violation) if violation.allowed_values.is_some() => format!(
                "Value for {} [{}] invalid, check your request against the allowed values and try again",
                violation.location, violation.field
            ),
            ErrorKind::FieldValidation(violation) => format!(
                "Invalid value for {} [{}], check your request and try again",
                violation.location, violation.field
            ),
            ErrorKind::GenericBadRequest => {
                "No additional information is available, check your request and try again"
                    .to_string()
            }
            ErrorKind::NotFound => {
                "The requested URL was not found, check the address and try again".to_string()
            }
            ErrorKind::InternalServerError => {
                "No additional information is available, please try again in a few minutes or seek support"
                    .to_string()
            }
        }
    }

    /// Diagnostic context. Only kinds that carry any have a `meta` member.
    pub fn meta(&self) -> Option<ErrorMeta> {
        match self {
            ErrorKind::TooLarge {
                maximum_content_length_allowed,
                request_content_length,
            } => Some(ErrorMeta::TooLarge {
                maximum_content_length_allowed: *maximum_content_length_allowed,
                request_content_length: *request_content_length,
            }),
            ErrorKind::UnsupportedMimeType {
                allowed_mime_types,
                instance_mime_type,
            } => Some(ErrorMeta::UnsupportedMimeType {
                allowed_mime_types: allowed_mime_types.clone(),
                instance_mime_type: instance_mime_type.clone(),
            }),
            ErrorKind::FieldValidation(violation) => {
                Some(ErrorMeta::FieldValidation(violation.clone()))
            }
            _ => None,
        }
    }

    /// Errors caused by the client's input rather than by routing or the server.
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            ErrorKind::MissingField { .. }
                | ErrorKind::EmptySelection { .. }
                | ErrorKind::TooLarge { .. }
                | ErrorKind::UnsupportedMimeType { .. }
                | ErrorKind::FieldValidation(_)
        )
    }

    /// Message used when the error is logged or reported.
    pub fn log_message(&self) -> String {
        match self {
            ErrorKind::TooLarge {
                request_content_length: Some(length),
                ..
            } => format!("Request content length, [{length}], is too great"),
            ErrorKind::UnsupportedMimeType {
                instance_mime_type, ..
            } => format!("File type uploaded, [{instance_mime_type}], is not allowed"),
            other => other.to_string(),
        }
    }
}

/// Kind-specific `meta` member of an error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorMeta {
    TooLarge {
        maximum_content_length_allowed: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        request_content_length: Option<u64>,
    },
    UnsupportedMimeType {
        allowed_mime_types: Vec<String>,
        instance_mime_type: String,
    },
    FieldValidation(FieldViolation),
}

/// One JSON-API error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub id: Uuid,
    pub status: ErrorStatus,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ErrorMeta>,
}

impl ErrorObject {
    /// Build the object for `kind` with a freshly generated `id`.
    pub fn new(kind: &ErrorKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: kind.status(),
            title: kind.to_string(),
            detail: kind.detail(),
            meta: kind.meta(),
        }
    }
}

impl From<&ErrorKind> for ErrorObject {
    fn from(kind: &ErrorKind) -> Self {
        ErrorObject::new(kind)
    }
}

/// The `{"errors": [...]}` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorObject>,
}

impl ErrorEnvelope {
    pub fn single(error: ErrorObject) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Status of the response carrying this envelope: the first error's.
    pub fn status(&self) -> ErrorStatus {
        self.errors
            .first()
            .map(|e| e.status)
            .unwrap_or(ErrorStatus::InternalServerError)
    }
}

impl From<ErrorKind> for ErrorEnvelope {
    fn from(kind: ErrorKind) -> Self {
        ErrorEnvelope::single(ErrorObject::new(&kind))
    }
}
