use super::ResultAggregator;
use crate::error::{Result, ScanError};
use crate::model::{ScanConfig, ScanResult, ScanResultSet, ScanTarget};
use crate::prober::{default_prober, Prober};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Callback invoked once per finished target, from the worker that probed it.
pub type ResultHook = Arc<dyn Fn(&ScanResult) + Send + Sync>;

/// Runs a [`Prober`] over many targets with a fixed number of requests in flight.
///
/// A slot is taken from the concurrency gate before each worker is spawned
/// and is held by that worker until it finishes, so at most `concurrency`
/// probes run at once and at most `concurrency` workers exist at once.
/// [`run`](Self::run) returns only after every worker has been joined.
pub struct Coordinator {
    prober: Arc<dyn Prober>,
    concurrency: usize,
    on_result: Option<ResultHook>,
}

impl Coordinator {
    pub fn new(prober: Arc<dyn Prober>, concurrency: usize) -> Self {
        Self {
            prober,
            concurrency,
            on_result: None,
        }
    }

    /// Builds a coordinator that probes over HTTP with `config`.
    pub fn from_config(config: Arc<ScanConfig>) -> Result<Self> {
        config.validate()?;
        let concurrency = config.concurrency;
        let prober = default_prober(config)?;
        Ok(Self::new(Arc::new(prober), concurrency))
    }

    /// Registers a callback run after each target is probed.
    ///
    /// The callback runs on worker tasks and must not block. A panic inside it
    /// is logged and the result is kept.
    pub fn on_result<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ScanResult) + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(hook));
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probes every target exactly once and returns all results.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NoTargets`] for an empty target list and
    /// [`ScanError::InvalidConcurrency`] for a concurrency of zero. Failures
    /// of individual targets are never returned as errors.
    pub async fn run(&self, targets: Vec<ScanTarget>) -> Result<ScanResultSet> {
        if targets.is_empty() {
            return Err(ScanError::NoTargets);
        }
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }

        let total = targets.len();
        let started_at = Utc::now();
        info!(
            targets = total,
            concurrency = self.concurrency,
            prober = self.prober.name(),
            "starting scan"
        );

        let gate = Arc::new(Semaphore::new(self.concurrency));
        let aggregator = Arc::new(ResultAggregator::with_capacity(total));
        let mut workers = JoinSet::new();

        for target in targets {
            let permit = match Arc::clone(&gate).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(url = %target, error = %e, "concurrency gate closed");
                    aggregator.push(ScanResult::failed(
                        target.as_str(),
                        format!("Probe not started: {e}"),
                    ));
                    continue;
                }
            };

            let prober = Arc::clone(&self.prober);
            let aggregator = Arc::clone(&aggregator);
            let hook = self.on_result.clone();

            workers.spawn(async move {
                let _permit = permit;
                let result = probe_guarded(prober.as_ref(), &target).await;
                log_result(&result);
                if let Some(hook) = hook {
                    run_hook(hook.as_ref(), &result);
                }
                aggregator.push(result);
            });

            // Reap finished workers so completed task handles do not pile up.
            while let Some(joined) = workers.try_join_next() {
                log_join_error(joined);
            }
        }

        while let Some(joined) = workers.join_next().await {
            log_join_error(joined);
        }

        let results = aggregator.drain();
        if results.len() != total {
            warn!(
                expected = total,
                collected = results.len(),
                "result count does not match target count"
            );
        }

        let set = ScanResultSet::new(results, started_at);
        let summary = set.summary();
        info!(
            total = summary.total,
            successful = summary.successful,
            with_cors = summary.with_cors,
            "scan finished"
        );
        Ok(set)
    }
}

/// Runs one probe, turning a panic inside the prober into a failed result.
async fn probe_guarded(prober: &dyn Prober, target: &ScanTarget) -> ScanResult {
    match AssertUnwindSafe(prober.probe(target)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            warn!(url = %target, %reason, "prober panicked");
            ScanResult::failed(target.as_str(), format!("Probe aborted: {reason}"))
        }
    }
}

/// Calls the result hook, containing any panic so the result is still kept.
fn run_hook(hook: &(dyn Fn(&ScanResult) + Send + Sync), result: &ScanResult) {
    if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(|| hook(result))) {
        let reason = panic_message(panic.as_ref());
        warn!(url = %result.url, %reason, "result hook panicked");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_result(result: &ScanResult) {
    match &result.error {
        Some(error) => warn!(url = %result.url, %error, "probe failed"),
        None if result.has_cors => info!(
            url = %result.url,
            status = result.status_code,
            headers = ?result.cors_headers,
            "CORS headers present"
        ),
        None => info!(url = %result.url, status = result.status_code, "no CORS headers"),
    }
}

fn log_join_error(joined: std::result::Result<(), JoinError>) {
    match joined {
        Ok(()) => {}
        Err(e) => warn!(error = %e, "scan worker did not complete"),
    }
}

/// Scans `targets` over HTTP with `config`.
pub async fn scan(targets: Vec<ScanTarget>, config: ScanConfig) -> Result<ScanResultSet> {
    let coordinator = Coordinator::from_config(Arc::new(config))?;
    debug!(concurrency = coordinator.concurrency(), "coordinator ready");
    coordinator.run(targets).await
}
