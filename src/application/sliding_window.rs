//! Sliding-window log limiter.
//!
//! Tracks, per identity, the exact timestamps of recently admitted messages
//! inside a trailing time window and admits while the count of events still
//! inside the window is below a cap.

use crate::application::limiter::RateLimiter;
use crate::application::metrics::Metrics;
use crate::application::ports::Clock;
use crate::domain::policy::SlidingWindowPolicy;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::storage::ShardedStorage;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Per-identity sliding-window rate limiter.
///
/// The limiter exclusively owns its identity map. Identities whose entire
/// window has expired are removed from the map, so memory does not grow
/// unboundedly with identity churn.
///
/// # Example
/// ```
/// use message_throttle::{RateLimiter, SlidingWindowLimiter};
/// use std::time::Duration;
///
/// let limiter = SlidingWindowLimiter::new(Duration::from_secs(10), 3);
///
/// assert!(limiter.record_message(&"alice"));
/// assert!(limiter.record_message(&"alice"));
/// assert!(limiter.record_message(&"alice"));
/// assert!(!limiter.record_message(&"alice"));
/// ```
#[derive(Debug)]
pub struct SlidingWindowLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    state: ShardedStorage<K, SlidingWindowPolicy>,
    clock: Arc<dyn Clock>,
    policy: SlidingWindowPolicy,
    metrics: Metrics,
}

impl<K> SlidingWindowLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a limiter driven by the system clock.
    ///
    /// # Arguments
    /// * `window_size` - Length of the trailing time window
    /// * `max_requests` - Maximum admitted messages per identity per window
    pub fn new(window_size: Duration, max_requests: usize) -> Self {
        Self::with_clock(window_size, max_requests, Arc::new(SystemClock::new()))
    }

    /// Create a limiter with an injected clock.
    ///
    /// Tests use this with `MockClock` to exercise expiry boundaries
    /// without real waiting.
    pub fn with_clock(window_size: Duration, max_requests: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: ShardedStorage::new(),
            clock,
            policy: SlidingWindowPolicy::new(window_size, max_requests),
            metrics: Metrics::new(),
        }
    }

    /// Get the configured window length.
    pub fn window_size(&self) -> Duration {
        self.policy.window_size()
    }

    /// Get the configured per-window cap.
    pub fn max_requests(&self) -> usize {
        self.policy.max_requests()
    }

    /// Get the limiter's metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Drop all per-identity state.
    pub fn clear(&self) {
        self.state.clear();
    }

    /// Remove the identity's entry if its whole window has expired.
    fn prune_if_idle(&self, identity: &K) {
        if self.state.remove_if(identity, |_, p| p.is_idle()) {
            self.metrics.record_identity_expired();
            trace!(identity = ?identity, "identity window expired, entry removed");
        }
    }
}

impl<K> RateLimiter<K> for SlidingWindowLimiter<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn can_send_message(&self, identity: &K) -> bool {
        let now = self.clock.now();

        let (allowed, idle) = match self
            .state
            .update_entry(identity, |policy| (policy.check(now).is_allow(), policy.is_idle()))
        {
            Some(result) => result,
            // Unseen identities hold zero timestamps, which only a
            // non-zero cap admits.
            None => return self.policy.max_requests() > 0,
        };

        if idle {
            self.prune_if_idle(identity);
        }
        allowed
    }

    fn record_message(&self, identity: &K) -> bool {
        let now = self.clock.now();

        // The entry guard holds the shard lock across prune and append,
        // making check-then-mutate atomic for this identity.
        let (decision, idle) = self.state.with_entry_mut(
            identity.clone(),
            || {
                trace!(identity = ?identity, "tracking new identity");
                self.policy.clone()
            },
            |policy| {
                let decision = policy.register_event(now);
                (decision, policy.is_idle())
            },
        );

        if idle {
            self.prune_if_idle(identity);
        }

        if decision.is_allow() {
            self.metrics.record_allowed();
            trace!(identity = ?identity, "message admitted");
        } else {
            self.metrics.record_rejected();
            debug!(identity = ?identity, "window cap reached, message rejected");
        }
        decision.is_allow()
    }

    fn time_until_next_allowed(&self, identity: &K) -> Duration {
        let now = self.clock.now();

        let (wait, idle) = match self
            .state
            .update_entry(identity, |policy| {
                (policy.time_until_next_allowed(now), policy.is_idle())
            }) {
            Some(result) => result,
            None => return Duration::ZERO,
        };

        if idle {
            self.prune_if_idle(identity);
        }
        wait
    }

    fn tracked_identities(&self) -> usize {
        self.state.len()
    }
}
