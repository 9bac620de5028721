//! Error objects, request ID resolution and upload checks for the upload endpoint.

pub mod error;
pub mod request_id;
pub mod upload;

pub use error::{
    ErrorEnvelope, ErrorKind, ErrorMeta, ErrorObject, ErrorStatus, FieldLocation, FieldViolation,
};
pub use request_id::{generate_request_id, RequestIdPolicy, SingleIdPolicy, REQUEST_ID_HEADER};
pub use upload::{
    check_declared_length, check_file, check_file_selected, check_mime_type, MimeAllowList,
    UploadConstraints, UploadedFile, ValidationOutcome,
};
