//! Per-service request accounting

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counts network calls issued by one service instance.
///
/// Clones share the same count, so a lazy result stream holding a clone
/// updates the owning service.
#[derive(Debug, Clone, Default)]
pub struct RequestCounter {
    issued: Arc<AtomicU64>,
}

impl RequestCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one issued request and return the new total
    pub fn record(&self) -> u64 {
        let total = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Issued request #{}", total);
        total
    }

    /// Requests issued so far
    pub fn get(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}
