//! Fixed-minimum-interval (throttling) limiter.
//!
//! Tracks, per identity, only the timestamp of the last admitted message
//! and admits once a fixed minimum interval has elapsed since it.

use crate::application::limiter::RateLimiter;
use crate::application::metrics::Metrics;
use crate::application::ports::Clock;
use crate::domain::policy::ThrottlingPolicy;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::storage::ShardedStorage;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Per-identity throttling rate limiter.
///
/// Stores a single timestamp per identity, overwritten on each admitted
/// message and never removed: the map is bounded by the number of distinct
/// identities ever seen. That trade-off (versus the sliding window's
/// self-pruning) is intentional; callers with unbounded identity churn can
/// call [`clear`](ThrottlingLimiter::clear) at period boundaries.
///
/// # Example
/// ```
/// use message_throttle::{RateLimiter, ThrottlingLimiter};
/// use std::time::Duration;
///
/// let limiter = ThrottlingLimiter::new(Duration::from_secs(10));
///
/// assert!(limiter.record_message(&"alice"));
/// assert!(!limiter.record_message(&"alice"));
/// assert!(limiter.record_message(&"bob"));
/// ```
#[derive(Debug)]
pub struct ThrottlingLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    state: ShardedStorage<K, ThrottlingPolicy>,
    clock: Arc<dyn Clock>,
    policy: ThrottlingPolicy,
    metrics: Metrics,
}

impl<K> ThrottlingLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a limiter driven by the system clock.
    ///
    /// # Arguments
    /// * `min_interval` - Minimum spacing between admitted messages per identity
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, Arc::new(SystemClock::new()))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: ShardedStorage::new(),
            clock,
            policy: ThrottlingPolicy::new(min_interval),
            metrics: Metrics::new(),
        }
    }

    /// Get the configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.policy.min_interval()
    }

    /// Get the limiter's metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Drop all per-identity state.
    pub fn clear(&self) {
        self.state.clear();
    }
}

impl<K> RateLimiter<K> for ThrottlingLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn can_send_message(&self, identity: &K) -> bool {
        let now = self.clock.now();

        // First message of an identity is always admitted
        self.state
            .read_entry(identity, |policy| policy.check(now).is_allow())
            .unwrap_or(true)
    }

    fn record_message(&self, identity: &K) -> bool {
        let now = self.clock.now();

        // The entry guard holds the shard lock across check and overwrite,
        // making check-then-mutate atomic for this identity.
        let decision = self.state.with_entry_mut(
            identity.clone(),
            || {
                trace!(identity = ?identity, "tracking new identity");
                self.policy.clone()
            },
            |policy| policy.register_event(now),
        );

        if decision.is_allow() {
            self.metrics.record_allowed();
            trace!(identity = ?identity, "message admitted");
        } else {
            self.metrics.record_rejected();
            debug!(identity = ?identity, "interval not yet elapsed, message rejected");
        }
        decision.is_allow()
    }

    fn time_until_next_allowed(&self, identity: &K) -> Duration {
        let now = self.clock.now();

        self.state
            .read_entry(identity, |policy| policy.time_until_next_allowed(now))
            .unwrap_or(Duration::ZERO)
    }

    fn tracked_identities(&self) -> usize {
        self.state.len()
    }
}
