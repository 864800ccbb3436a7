use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking ingest pipeline outcomes.
///
/// All counters use relaxed ordering for maximum throughput. For a
/// consistent point-in-time view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct IngestMetrics {
    /// Files received by the pipeline, whatever their outcome.
    pub received: AtomicU64,
    /// Files that produced a persisted dashboard artifact.
    pub created: AtomicU64,
    /// Files turned away by intake validation.
    pub rejected: AtomicU64,
    /// Files blocked by an exhausted daily allowance.
    pub quota_blocked: AtomicU64,
    /// Files that failed in generation or persistence.
    pub failed: AtomicU64,
}

impl IngestMetrics {
    /// Increment the received counter.
    pub fn increment_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the created counter.
    pub fn increment_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the rejected counter.
    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the quota-blocked counter.
    pub fn increment_quota_blocked(&self) {
        self.quota_blocked.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the failed counter.
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> IngestMetricsSnapshot {
        IngestMetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            quota_blocked: self.quota_blocked.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`IngestMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestMetricsSnapshot {
    /// Files received by the pipeline.
    pub received: u64,
    /// Files that produced a dashboard artifact.
    pub created: u64,
    /// Files turned away by intake validation.
    pub rejected: u64,
    /// Files blocked by an exhausted daily allowance.
    pub quota_blocked: u64,
    /// Files that failed in generation or persistence.
    pub failed: u64,
}
