use super::cors::{canonical_header_name, is_cors_header, spoofed_origin};
use crate::error::Result;
use crate::model::{ScanConfig, ScanResult, ScanTarget};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN};
use reqwest::{Client, Method, Request};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Probes targets over HTTP with a spoofed `Origin` header.
///
/// One client (and its connection pool) is shared by every probe made
/// through this prober.
pub struct HttpProber {
    client: Client,
    config: Arc<ScanConfig>,
}

impl HttpProber {
    /// Creates a prober whose requests are bounded by `config.timeout`.
    /// A zero timeout leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised
    /// (e.g. no TLS backend is available).
    pub fn new(config: Arc<ScanConfig>) -> Result<Self> {
        let mut builder = Client::builder();
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Probes `url` without requiring it to be a validated [`ScanTarget`].
    pub async fn probe_url(&self, url: &str) -> ScanResult {
        let request = match self.build_request(url) {
            Ok(request) => request,
            Err(reason) => {
                debug!(url, %reason, "request construction failed");
                return ScanResult::failed(url, format!("Could not construct request: {reason}"));
            }
        };

        debug!(
            url,
            method = %request.method(),
            origin = ?request.headers().get(ORIGIN),
            "sending probe"
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e, self.config.timeout);
                debug!(url, error = %message, "probe failed");
                return ScanResult::failed(url, message);
            }
        };

        let status = response.status().as_u16();
        let (headers, cors_headers) = collect_headers(response.headers());
        debug!(url, status, cors = cors_headers.len(), "probe completed");

        ScanResult::completed(url, status, headers, cors_headers)
    }

    fn build_request(&self, url: &str) -> std::result::Result<Request, String> {
        let method = Method::from_bytes(self.config.method.as_bytes())
            .map_err(|_| format!("invalid HTTP method '{}'", self.config.method))?;
        let parsed = Url::parse(url).map_err(|e| format!("invalid URL '{url}': {e}"))?;
        let origin = spoofed_origin(&parsed);

        let mut request = self
            .client
            .request(method, parsed)
            .build()
            .map_err(|e| error_chain(&e))?;

        let headers = request.headers_mut();
        for (name, value) in &self.config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("invalid header name '{name}'"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| format!("invalid value for header '{name}'"))?;
            headers.insert(name, value);
        }

        if let Some(origin) = origin {
            let value = HeaderValue::from_str(&origin)
                .map_err(|_| format!("invalid origin '{origin}'"))?;
            headers.insert(ORIGIN, value);
        }

        Ok(request)
    }
}

#[async_trait]
impl super::Prober for HttpProber {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn probe(&self, target: &ScanTarget) -> ScanResult {
        self.probe_url(target.as_str()).await
    }
}

/// Copies response headers, joining repeated values with `", "`, and lists
/// the CORS-related names among them.
fn collect_headers(map: &HeaderMap) -> (BTreeMap<String, String>, Vec<String>) {
    let mut headers = BTreeMap::new();
    let mut cors_headers = Vec::new();

    for name in map.keys() {
        let value = map
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");

        let display_name = canonical_header_name(name.as_str());
        if is_cors_header(name.as_str()) {
            cors_headers.push(display_name.clone());
        }
        headers.insert(display_name, value);
    }

    cors_headers.sort();
    (headers, cors_headers)
}

fn describe_transport_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("Request failed: timed out after {timeout:?}")
    } else if err.is_connect() {
        format!("Request failed: connection error: {}", error_chain(err))
    } else {
        format!("Request failed: {}", error_chain(err))
    }
}

/// Renders an error and its sources as `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prober(config: ScanConfig) -> HttpProber {
        HttpProber::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_build_request_sets_spoofed_origin_and_fixed_headers() {
        let prober = prober(ScanConfig::default().with_header("X-Audit", "yes"));
        let request = prober.build_request("https://a.test/path").unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.headers().get(ORIGIN).unwrap(),
            "https://a.test-test.cors.com"
        );
        assert_eq!(request.headers().get("x-audit").unwrap(), "yes");
        assert!(request.headers().get("user-agent").is_some());
    }

    #[test]
    fn test_build_request_spoofed_origin_replaces_configured_origin() {
        let prober = prober(ScanConfig::default().with_header("Origin", "https://trusted.test"));
        let request = prober.build_request("https://a.test/").unwrap();

        let origins: Vec<_> = request.headers().get_all(ORIGIN).iter().collect();
        assert_eq!(origins, vec!["https://a.test-test.cors.com"]);
    }

    #[test]
    fn test_build_request_uses_configured_method() {
        let prober = prober(ScanConfig::new("OPTIONS"));
        let request = prober.build_request("http://a.test/").unwrap();
        assert_eq!(request.method(), Method::OPTIONS);
    }

    #[test]
    fn test_build_request_rejects_bad_method() {
        let prober = prober(ScanConfig::new("GE T"));
        let err = prober.build_request("http://a.test/").unwrap_err();
        assert!(err.contains("invalid HTTP method"));
    }

    #[tokio::test]
    async fn test_malformed_url_never_reaches_network() {
        let prober = prober(ScanConfig::default());
        let result = prober.probe_url("ht!tp:/nowhere").await;

        assert_eq!(result.status_code, 0);
        assert!(!result.has_cors);
        assert!(result.headers.is_empty());
        let error = result.error.unwrap();
        assert!(error.starts_with("Could not construct request"), "{error}");
    }

    #[test]
    fn test_collect_headers_joins_values_and_detects_cors() {
        let mut map = HeaderMap::new();
        map.append("vary", HeaderValue::from_static("Origin"));
        map.append("vary", HeaderValue::from_static("Accept-Encoding"));
        map.insert(
            "access-control-allow-origin",
            HeaderValue::from_static("*"),
        );
        map.insert(
            "access-control-allow-credentials",
            HeaderValue::from_static("true"),
        );

        let (headers, cors) = collect_headers(&map);
        assert_eq!(headers["Vary"], "Origin, Accept-Encoding");
        assert_eq!(
            cors,
            vec![
                "Access-Control-Allow-Credentials".to_string(),
                "Access-Control-Allow-Origin".to_string(),
            ]
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
        assert_eq!(error_chain(&inner), "connection refused");
    }
}
