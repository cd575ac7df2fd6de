//! Error types for corsprobe.
//!
//! Only failures that make a scan impossible are modelled here. Problems
//! with an individual target (DNS, connect, timeout, malformed URL) are
//! recorded on its [`ScanResult`](crate::model::ScanResult) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised before, during setup of, or after a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No targets to scan: specify a URL or a file containing URLs")]
    NoTargets,

    #[error("Cannot read input file {}: {source}", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid URLs found in {}", .path.display())]
    NoValidUrls { path: PathBuf },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Invalid header '{0}': expected 'Name: Value'")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Cannot write report to {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScanError {
    /// Returns true for errors caused by the operator's input or settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScanError::NoTargets
                | ScanError::InputFile { .. }
                | ScanError::NoValidUrls { .. }
                | ScanError::InvalidTarget { .. }
                | ScanError::InvalidConcurrency
                | ScanError::InvalidHeader(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
