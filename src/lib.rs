pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod prober;
pub mod runner;
pub mod scan;

pub use config::Config;
pub use error::ScanError;
pub use model::{ScanConfig, ScanResult, ScanResultSet, ScanSummary, ScanTarget};
pub use prober::Prober;
pub use scan::Coordinator;
