//! Error types for the analysis adapter.

use thiserror::Error;

/// A failure reported by one of the downstream AWS services.
///
/// The machine-readable `code` and the original message are preserved
/// verbatim so callers can distinguish throttling, auth, and validation
/// rejections without this layer interpreting them.
#[derive(Debug, Clone, Error)]
#[error("{service} request failed ({}): {message}", .code.as_deref().unwrap_or("unknown"))]
pub struct BackendError {
    /// Which backend produced the error ("comprehendmedical" or "s3").
    pub service: &'static str,
    /// Machine-readable error code from the service, when one was returned.
    pub code: Option<String>,
    /// Original error message from the service.
    pub message: String,
}

impl BackendError {
    pub fn new(
        service: &'static str,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service,
            code,
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`execute`](crate::executor::AnalysisNodeExecutor::execute).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input rejected locally before any backend call was made.
    #[error("validation error: {0}")]
    Validation(String),
    /// A backend call failed; propagated unchanged from the service.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The merged result could not be serialized for persistence.
    #[error("failed to serialize analysis result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// The backend error code, when this is a backend failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            AnalysisError::Backend(err) => err.code.as_deref(),
            _ => None,
        }
    }
}
