use crate::model::ScanResult;
use parking_lot::Mutex;

/// Collects results pushed concurrently by scan workers.
///
/// Every append happens under one lock. Draining is meant for the point
/// where all workers have been joined.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Mutex<Vec<ScanResult>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn push(&self, result: ScanResult) {
        self.results.lock().push(result);
    }

    pub fn len(&self) -> usize {
        self.results.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.lock().is_empty()
    }

    /// Takes every collected result, leaving the aggregator empty.
    pub fn drain(&self) -> Vec<ScanResult> {
        std::mem::take(&mut *self.results.lock())
    }

    pub fn into_results(self) -> Vec<ScanResult> {
        self.results.into_inner()
    }
}
