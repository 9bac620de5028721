//! Uploaded files and the checks applied to them.
//!
//! Each check returns `Ok(())` to pass the request on to the next stage or the
//! [`ErrorKind`] that ends it.

use bytes::{Buf, Bytes};
use mime::Mime;

use crate::error::ErrorKind;

/// Content type assumed for a part that does not declare one (RFC 7578 §4.4).
pub const DEFAULT_PART_CONTENT_TYPE: &str = "text/plain";

/// Result of running the upload checks for a request.
pub type ValidationOutcome<T> = Result<T, ErrorKind>;

/// A file part that passed every check.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    contents: Bytes,
}

impl UploadedFile {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        contents: Bytes,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type,
            contents,
        }
    }

    /// Declared content type, or the multipart default when none was sent.
    pub fn effective_content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or(DEFAULT_PART_CONTENT_TYPE)
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }

    pub fn reader(&self) -> impl std::io::Read {
        self.contents.clone().reader()
    }
}

/// MIME types accepted by a restricted route.
#[derive(Debug, Clone, PartialEq)]
pub struct MimeAllowList {
    raw: Vec<String>,
    parsed: Vec<Mime>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid MIME type \"{value}\"")]
pub struct InvalidMimeType {
    pub value: String,
}

impl MimeAllowList {
    pub fn parse<I, S>(types: I) -> Result<Self, InvalidMimeType>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut raw = Vec::new();
        let mut parsed = Vec::new();
        for value in types {
            let value = value.into();
            let mime = value
                .trim()
                .parse::<Mime>()
                .map_err(|_| InvalidMimeType {
                    value: value.clone(),
                })?;
            raw.push(value.trim().to_string());
            parsed.push(mime);
        }
        Ok(Self { raw, parsed })
    }

    /// Types as configured, used for `meta.allowed_mime_types`.
    pub fn as_strings(&self) -> &[String] {
        &self.raw
    }

    /// Type and subtype are compared case-insensitively, parameters are ignored.
    pub fn allows(&self, content_type: &str) -> bool {
        let Ok(candidate) = content_type.trim().parse::<Mime>() else {
            return false;
        };
        self.parsed
            .iter()
            .any(|allowed| allowed.essence_str().eq_ignore_ascii_case(candidate.essence_str()))
    }
}

/// Constraints a route places on its uploads beyond field presence.
#[derive(Debug, Clone, Default)]
pub struct UploadConstraints {
    pub max_content_length: Option<u64>,
    pub allowed_mime_types: Option<MimeAllowList>,
}

impl UploadConstraints {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn with_max_content_length(mut self, limit: u64) -> Self {
        self.max_content_length = Some(limit);
        self
    }

    pub fn with_allowed_mime_types(mut self, allowed: MimeAllowList) -> Self {
        self.allowed_mime_types = Some(allowed);
        self
    }
}

/// Reject a request whose declared length is over `limit`. An undeclared
/// length passes; the body limit catches it while streaming.
pub fn check_declared_length(declared: Option<u64>, limit: u64) -> Result<(), ErrorKind> {
    match declared {
        Some(length) if length > limit => Err(ErrorKind::too_large(limit, Some(length))),
        _ => Ok(()),
    }
}

/// Browsers send an empty filename when no file was chosen.
pub fn check_file_selected(field: &str, file_name: &str) -> Result<(), ErrorKind> {
    if file_name.trim().is_empty() {
        return Err(ErrorKind::empty_selection(field));
    }
    Ok(())
}

pub fn check_mime_type(allowed: &MimeAllowList, content_type: &str) -> Result<(), ErrorKind> {
    if allowed.allows(content_type) {
        return Ok(());
    }
    Err(ErrorKind::unsupported_mime_type(
        allowed.as_strings().to_vec(),
        content_type,
    ))
}

/// Run the per-file checks a route's constraints call for.
pub fn check_file(
    field: &str,
    file: &UploadedFile,
    constraints: &UploadConstraints,
) -> Result<(), ErrorKind> {
    check_file_selected(field, &file.file_name)?;
    if let Some(allowed) = &constraints.allowed_mime_types {
        check_mime_type(allowed, file.effective_content_type())?;
    }
    Ok(())
}
