//! Error types surfaced to callers of the core.

use serde::Serialize;

/// Errors produced while configuring or executing a request.
///
/// None of these are retried. Each one is terminal for the request that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzerError {
    /// The raw URL had no extractable host. Raised before any network access.
    #[error("Invalid URL: {input}")]
    InvalidUrl { input: String },
    /// The transport did not complete within the configured timeout.
    #[error("Request timeout after {timeout_secs}s: {cause}")]
    Timeout { timeout_secs: u64, cause: String },
    /// Any other transport-level failure.
    #[error("Request failed: {cause}")]
    RequestFailed { cause: String },
}

/// Coarse classification of an [`AnalyzerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    Timeout,
    RequestFailed,
}

impl AnalyzerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyzerError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            AnalyzerError::Timeout { .. } => ErrorKind::Timeout,
            AnalyzerError::RequestFailed { .. } => ErrorKind::RequestFailed,
        }
    }

    /// Process exit status for this error kind.
    ///
    /// `1` is left for failures outside this taxonomy (e.g. writing output).
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidUrl => 2,
            ErrorKind::Timeout => 3,
            ErrorKind::RequestFailed => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
