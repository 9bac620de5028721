//! Diagnostics side channel
//!
//! Recovered client errors are forwarded as informational events to a
//! background sink. Reporting never blocks and never fails the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    pub request_id: String,
    pub status: u16,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn new(
        request_id: impl Into<String>,
        status: u16,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            status,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Cloneable handle to the diagnostics channel. A disabled handle drops
/// every event.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    tx: Option<Sender<DiagnosticEvent>>,
}

impl Diagnostics {
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Bounded channel without a consumer attached.
    pub fn channel(capacity: usize) -> (Self, Receiver<DiagnosticEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// Bounded channel drained by a task that logs each event under the
    /// `diagnostics` target. Must be called inside a tokio runtime.
    pub fn spawn(capacity: usize) -> Self {
        let (handle, rx) = Self::channel(capacity);
        tokio::spawn(run_sink(rx));
        handle
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn report(&self, event: DiagnosticEvent) {
        let Some(tx) = &self.tx else { return };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(request_id = %event.request_id, "Diagnostics channel full, event dropped");
            }
            Err(TrySendError::Closed(event)) => {
                debug!(request_id = %event.request_id, "Diagnostics channel closed, event dropped");
            }
        }
    }
}

async fn run_sink(mut rx: Receiver<DiagnosticEvent>) {
    while let Some(event) = rx.recv().await {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        info!(
            target: "diagnostics",
            request_id = %event.request_id,
            status = event.status,
            event = %payload,
            "{}",
            event.message
        );
    }
}
