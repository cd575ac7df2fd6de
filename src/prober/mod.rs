//! Single-target CORS probing.
//!
//! A [`Prober`] sends exactly one request per target and always returns a
//! [`ScanResult`]: transport failures, timeouts and malformed URLs are
//! recorded in the result's `error` field instead of being returned as
//! errors.
//!
//! # Example
//!
//! ```no_run
//! use corsprobe::prober::{HttpProber, Prober};
//! use corsprobe::{ScanConfig, ScanTarget};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let prober = HttpProber::new(Arc::new(ScanConfig::default()))?;
//!     let target = ScanTarget::parse("https://example.com")?;
//!
//!     let result = prober.probe(&target).await;
//!     println!("{} -> CORS headers: {:?}", result.url, result.cors_headers);
//!     Ok(())
//! }
//! ```

mod cors;
mod http;

pub use cors::{
    canonical_header_name, is_cors_header, spoofed_origin, CORS_HEADER_PATTERNS, ORIGIN_SUFFIX,
};
pub use http::HttpProber;

use crate::error::Result;
use crate::model::{ScanConfig, ScanResult, ScanTarget};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for probing one target.
///
/// Implementations must not panic on bad input and must produce exactly one
/// result per call.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &'static str;

    /// Probes `target` once and reports what happened.
    async fn probe(&self, target: &ScanTarget) -> ScanResult;
}

pub fn default_prober(config: Arc<ScanConfig>) -> Result<HttpProber> {
    HttpProber::new(config)
}
