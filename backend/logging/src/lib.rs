//! Telemetry and structured logging components for the upload endpoint.
//!
//! Handles logger setup (console, JSON, file rotation), the diagnostics side
//! channel, and the named levels used by the logging meta endpoint.

pub mod diagnostics;
pub mod level;
pub mod logger;

pub use diagnostics::{DiagnosticEvent, Diagnostics};
pub use level::{LogLevel, UnknownLogLevel};
pub use logger::init_logger;
