//! Bounded-concurrency bulk scanning.
//!
//! [`Coordinator`] dispatches one worker per target under a counting gate
//! and collects their results through a [`ResultAggregator`].
//!
//! # Example
//!
//! ```no_run
//! use corsprobe::input::parse_targets;
//! use corsprobe::scan::scan;
//! use corsprobe::ScanConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let targets = parse_targets("https://a.example\nhttps://b.example\n");
//!     let config = ScanConfig::default().with_concurrency(2);
//!
//!     let results = scan(targets, config).await?;
//!     println!("{} targets expose CORS headers", results.with_cors().count());
//!     Ok(())
//! }
//! ```

mod aggregator;
mod coordinator;

pub use aggregator::ResultAggregator;
pub use coordinator::{scan, Coordinator, ResultHook};
