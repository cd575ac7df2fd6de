//! Core data types for targets, scan settings, and probe results.
//!
//! This module contains the fundamental types used throughout corsprobe:
//!
//! - [`ScanTarget`] - A URL scheduled for probing
//! - [`ScanConfig`] - Immutable request settings shared by every worker
//! - [`ScanResult`] - The outcome of probing one target
//! - [`ScanResultSet`] - Every result produced by one scan
//! - [`ScanSummary`] - Aggregate counts over a result set
//!
//! # Example
//!
//! ```
//! use corsprobe::{ScanResult, ScanResultSet};
//!
//! let failed = ScanResult::failed("http://a.test/", "Request failed: timed out");
//! let set = ScanResultSet::new(vec![failed], chrono::Utc::now());
//!
//! let summary = set.summary();
//! assert_eq!(summary.total, 1);
//! assert_eq!(summary.successful, 0);
//! ```

mod result;
mod scan_config;
mod target;

pub use result::*;
pub use scan_config::*;
pub use target::*;
