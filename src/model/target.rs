use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use url::Url;

/// A single URL scheduled for probing.
///
/// Targets built with [`ScanTarget::parse`] are guaranteed to carry a scheme
/// and a non-empty host. [`ScanTarget::unchecked`] skips that check so a
/// malformed URL can still be reported as a failed probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanTarget(String);

impl ScanTarget {
    /// Validates `raw` and wraps it. Surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|e| ScanError::InvalidTarget {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme().is_empty() {
            return Err(ScanError::InvalidTarget {
                url: trimmed.to_string(),
                reason: "missing scheme".to_string(),
            });
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ScanError::InvalidTarget {
                url: trimmed.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ScanTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_http_and_https() {
        assert!(ScanTarget::parse("http://example.com").is_ok());
        assert!(ScanTarget::parse("https://api.example.com:8443/v1?x=1").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let target = ScanTarget::parse("  https://example.com/  ").unwrap();
        assert_eq!(target.as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert!(ScanTarget::parse("example.com").is_err());
        assert!(ScanTarget::parse("/just/a/path").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_host() {
        assert!(ScanTarget::parse("mailto:someone@example.com").is_err());
        assert!(ScanTarget::parse("file:///etc/passwd").is_err());
        assert!(ScanTarget::parse("").is_err());
    }

    #[test]
    fn test_unchecked_keeps_raw_value() {
        let target = ScanTarget::unchecked("not a url");
        assert_eq!(target.to_string(), "not a url");
    }
}
