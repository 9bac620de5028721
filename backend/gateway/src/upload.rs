//! Multipart upload validation.
//!
//! Reads the multipart body into [`UploadedFile`]s and runs the checks a
//! route calls for, stopping at the first failure.

use axum::extract::{Multipart, multipart::MultipartRejection};
use upload_endpoint_core::{ErrorKind, UploadConstraints, UploadedFile, ValidationOutcome, check_file};

use crate::errors::classify_multipart_error;

/// Field names accepted by the multi-file route.
pub const MULTIPLE_FILE_FIELDS: [&str; 2] = ["files[]", "files"];

/// Field name reported in errors from the multi-file route.
pub const MULTIPLE_FILE_ERROR_FIELD: &str = "files";

/// Collect the file parts named one of `fields`, in body order. Parts
/// without a filename are form values and are skipped. `body_limit` is the
/// ceiling reported if the body exceeds it while streaming.
async fn read_files(
    multipart: Result<Multipart, MultipartRejection>,
    fields: &[&str],
    missing_field: &str,
    body_limit: u64,
) -> ValidationOutcome<Vec<UploadedFile>> {
    // Not multipart/form-data, so the field cannot be present.
    let mut multipart = multipart.map_err(|_| ErrorKind::missing_field(missing_field))?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| classify_multipart_error(&e, body_limit))?
    {
        let Some(name) = field.name().filter(|n| fields.contains(n)).map(str::to_string) else {
            continue;
        };
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let contents = field
            .bytes()
            .await
            .map_err(|e| classify_multipart_error(&e, body_limit))?;
        files.push(UploadedFile::new(name, file_name, content_type, contents));
    }
    Ok(files)
}

/// Single-file path: the first file part named `field`.
pub async fn validate_single(
    multipart: Result<Multipart, MultipartRejection>,
    field: &str,
    constraints: &UploadConstraints,
    body_limit: u64,
) -> ValidationOutcome<UploadedFile> {
    let files = read_files(multipart, &[field], field, body_limit).await?;
    let file = files
        .into_iter()
        .next()
        .ok_or_else(|| ErrorKind::missing_field(field))?;
    check_file(field, &file, constraints)?;
    Ok(file)
}

/// Multi-file path: every file part named `files[]` or `files`. One bad
/// file rejects the whole request.
pub async fn validate_multiple(
    multipart: Result<Multipart, MultipartRejection>,
    constraints: &UploadConstraints,
    body_limit: u64,
) -> ValidationOutcome<Vec<UploadedFile>> {
    let files = read_files(
        multipart,
        &MULTIPLE_FILE_FIELDS,
        MULTIPLE_FILE_ERROR_FIELD,
        body_limit,
    )
    .await?;
    if files.is_empty() {
        return Err(ErrorKind::missing_field(MULTIPLE_FILE_ERROR_FIELD));
    }
    for file in &files {
        check_file(MULTIPLE_FILE_ERROR_FIELD, file, constraints)?;
    }
    Ok(files)
}
