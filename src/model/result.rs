use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of probing a single target.
///
/// `error` is only set when the request never produced a response; in that
/// case `status_code` is 0 and no headers are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub has_cors: bool,
    pub cors_headers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// A result for a target whose request could not be built or completed.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 0,
            headers: BTreeMap::new(),
            error: Some(error.into()),
            has_cors: false,
            cors_headers: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// A result for a target that answered. `cors_headers` must name keys of `headers`.
    pub fn completed(
        url: impl Into<String>,
        status_code: u16,
        headers: BTreeMap<String, String>,
        cors_headers: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            status_code,
            headers,
            error: None,
            has_cors: !cors_headers.is_empty(),
            cors_headers,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Detected CORS headers paired with their raw values.
    pub fn cors_header_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cors_headers.iter().map(|name| {
            let value = self.headers.get(name).map(String::as_str).unwrap_or("");
            (name.as_str(), value)
        })
    }
}

/// Every result produced by one scan invocation.
///
/// Result order reflects completion order and carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResultSet {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ScanResult>,
}

impl ScanResultSet {
    pub fn new(results: Vec<ScanResult>, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanResult> {
        self.results.iter()
    }

    /// Results that exposed at least one CORS header.
    pub fn with_cors(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.has_cors)
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_results(&self.results)
    }
}

impl<'a> IntoIterator for &'a ScanResultSet {
    type Item = &'a ScanResult;
    type IntoIter = std::slice::Iter<'a, ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Aggregate counts printed after every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub successful: usize,
    pub with_cors: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            if r.is_success() {
                acc.successful += 1;
            }
            if r.has_cors {
                acc.with_cors += 1;
            }
            acc
        })
    }

    /// Percentage of targets that answered without error; 0 for an empty scan.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total as f64 * 100.0
    }
}
