use crate::error::{Result, ScanError};
use std::collections::BTreeMap;
use std::time::Duration;

/// User-Agent sent when no other value is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("corsprobe/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Request settings for one scan.
///
/// Built once before the scan starts and shared read-only by every worker.
/// The method is kept as text: an unusable method surfaces as a per-target
/// request construction error rather than aborting the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Per-request timeout. Zero disables it.
    pub timeout: Duration,
    pub concurrency: usize,
}

impl ScanConfig {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Checks the settings a scan cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());

        Self {
            method: DEFAULT_METHOD.to_string(),
            headers,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
