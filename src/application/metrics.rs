//! Observability metrics for admission control.
//!
//! Provides counters about limiter behavior for monitoring and debugging.
//! Metrics are advisory only and never influence admission decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission statistics.
///
/// All counters use atomic operations for thread-safe updates and reads.
/// Cloning is cheap; clones share the same underlying counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of messages admitted
    requests_allowed: AtomicU64,
    /// Total number of messages rejected
    requests_rejected: AtomicU64,
    /// Total number of idle identities removed from the state map
    identities_expired: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_allowed: AtomicU64::new(0),
                requests_rejected: AtomicU64::new(0),
                identities_expired: AtomicU64::new(0),
            }),
        }
    }

    /// Record an admitted message.
    pub(crate) fn record_allowed(&self) {
        self.inner.requests_allowed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected message.
    pub(crate) fn record_rejected(&self) {
        self.inner.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the removal of an idle identity.
    pub(crate) fn record_identity_expired(&self) {
        self.inner
            .identities_expired
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of messages admitted.
    pub fn requests_allowed(&self) -> u64 {
        self.inner.requests_allowed.load(Ordering::Relaxed)
    }

    /// Get the total number of messages rejected.
    pub fn requests_rejected(&self) -> u64 {
        self.inner.requests_rejected.load(Ordering::Relaxed)
    }

    /// Get the total number of idle identities removed.
    pub fn identities_expired(&self) -> u64 {
        self.inner.identities_expired.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_allowed: self.requests_allowed(),
            requests_rejected: self.requests_rejected(),
            identities_expired: self.identities_expired(),
        }
    }

    /// Reset all counters to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.requests_allowed.store(0, Ordering::Relaxed);
        self.inner.requests_rejected.store(0, Ordering::Relaxed);
        self.inner.identities_expired.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of messages admitted
    pub requests_allowed: u64,
    /// Total number of messages rejected
    pub requests_rejected: u64,
    /// Total number of idle identities removed
    pub identities_expired: u64,
}

impl MetricsSnapshot {
    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no messages have been recorded.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.requests_allowed.saturating_add(self.requests_rejected);
        if total == 0 {
            0.0
        } else {
            self.requests_rejected as f64 / total as f64
        }
    }

    /// Get the total number of messages recorded (allowed + rejected).
    pub fn total_requests(&self) -> u64 {
        self.requests_allowed.saturating_add(self.requests_rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.requests_allowed(), 0);
        assert_eq!(metrics.requests_rejected(), 0);
        assert_eq!(metrics.identities_expired(), 0);
    }

    #[test]
    fn test_record_counters() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_rejected();
        metrics.record_identity_expired();

        assert_eq!(metrics.requests_allowed(), 2);
        assert_eq!(metrics.requests_rejected(), 1);
        assert_eq!(metrics.identities_expired(), 1);
    }

    #[test]
    fn test_snapshot_rejection_rate() {
        let metrics = Metrics::new();

        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        metrics.record_allowed();
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        metrics.record_rejected();
        assert!((metrics.snapshot().rejection_rate() - 0.5).abs() < f64::EPSILON);

        metrics.record_rejected();
        metrics.record_rejected();
        assert!((metrics.snapshot().rejection_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_total_requests() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().total_requests(), 0);

        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_rejected();
        assert_eq!(metrics.snapshot().total_requests(), 3);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_rejected();
        metrics.record_identity_expired();

        metrics.reset();
        assert_eq!(metrics.snapshot().total_requests(), 0);
        assert_eq!(metrics.identities_expired(), 0);
    }

    #[test]
    fn test_metrics_clone_shares_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_allowed();

        let metrics2 = metrics1.clone();
        metrics2.record_allowed();

        assert_eq!(metrics1.requests_allowed(), 2);
        assert_eq!(metrics2.requests_allowed(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_allowed();
                    m.record_rejected();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.requests_allowed(), 1000);
        assert_eq!(metrics.requests_rejected(), 1000);
    }
}
