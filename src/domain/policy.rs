//! Per-identity admission state machines.
//!
//! This module defines the two admission policies the crate ships. Each
//! policy is the state tracked for a single identity: the limiter layers
//! keep one policy value per identity and drive it with timestamps from an
//! injected clock.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Decision made by an admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Admit the message
    Allow,
    /// Reject the message; the caller may retry after the reported wait
    Reject,
}

impl AdmissionDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, AdmissionDecision::Allow)
    }

    /// Check if this decision is Reject.
    pub fn is_reject(&self) -> bool {
        matches!(self, AdmissionDecision::Reject)
    }
}

/// Sliding-window log state for a single identity.
///
/// Keeps the exact timestamps of recently accepted messages inside a
/// trailing time window. A message is admitted while the count of
/// timestamps still inside the window is below `max_requests`.
///
/// # Example
/// ```
/// use message_throttle::{AdmissionDecision, SlidingWindowPolicy};
/// use std::time::{Duration, Instant};
///
/// let mut policy = SlidingWindowPolicy::new(Duration::from_secs(10), 1);
/// let now = Instant::now();
///
/// assert!(policy.register_event(now).is_allow());
/// assert!(policy.register_event(now + Duration::from_secs(5)).is_reject());
///
/// // The original timestamp ages out of the window
/// assert!(policy.register_event(now + Duration::from_secs(11)).is_allow());
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindowPolicy {
    window_size: Duration,
    max_requests: usize,
    sent: VecDeque<Instant>,
}

impl SlidingWindowPolicy {
    /// Create a new sliding-window policy.
    ///
    /// # Arguments
    /// * `window_size` - Length of the trailing time window
    /// * `max_requests` - Maximum accepted messages inside the window
    ///
    /// A `max_requests` of zero rejects everything; a zero `window_size`
    /// expires history on every check. Both are well-defined degenerate
    /// configurations, not errors.
    pub fn new(window_size: Duration, max_requests: usize) -> Self {
        Self {
            window_size,
            max_requests,
            sent: VecDeque::new(),
        }
    }

    /// Get the configured window length.
    pub fn window_size(&self) -> Duration {
        self.window_size
    }

    /// Get the configured per-window cap.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Number of accepted timestamps currently retained.
    pub fn retained(&self) -> usize {
        self.sent.len()
    }

    /// True once every retained timestamp has expired.
    ///
    /// The limiter removes idle entries from its identity map so that
    /// churned identities do not accumulate.
    pub fn is_idle(&self) -> bool {
        self.sent.is_empty()
    }

    /// Drop timestamps that have fallen out of the window.
    ///
    /// The deque is time-ordered, so expiry is a prefix trim.
    fn expire_old_events(&mut self, now: Instant) {
        while let Some(&oldest) = self.sent.front() {
            if now.saturating_duration_since(oldest) > self.window_size {
                self.sent.pop_front();
            } else {
                break;
            }
        }
    }

    /// Check whether a message would be admitted right now.
    ///
    /// Prunes expired timestamps but reserves nothing: a subsequent
    /// `register_event` at the same instant sees the same state.
    pub fn check(&mut self, now: Instant) -> AdmissionDecision {
        self.expire_old_events(now);

        if self.sent.len() < self.max_requests {
            AdmissionDecision::Allow
        } else {
            AdmissionDecision::Reject
        }
    }

    /// Register a message attempt and decide whether to admit it.
    ///
    /// Prunes, then appends `now` and allows iff the retained count is
    /// below the cap. A rejection leaves the state untouched beyond the
    /// prune.
    pub fn register_event(&mut self, now: Instant) -> AdmissionDecision {
        self.expire_old_events(now);

        if self.sent.len() < self.max_requests {
            self.sent.push_back(now);
            AdmissionDecision::Allow
        } else {
            AdmissionDecision::Reject
        }
    }

    /// How long until the next message would be admitted.
    ///
    /// Zero when under the cap. Otherwise the oldest retained timestamp is
    /// the next to expire and free capacity, so the wait is the remainder
    /// of its window. With a cap of zero there is no pending timestamp and
    /// no wait can be reported; the result is zero.
    pub fn time_until_next_allowed(&mut self, now: Instant) -> Duration {
        self.expire_old_events(now);

        if self.sent.len() < self.max_requests {
            return Duration::ZERO;
        }

        match self.sent.front() {
            Some(&earliest) => match earliest.checked_add(self.window_size) {
                Some(expiry) => expiry.saturating_duration_since(now),
                None => Duration::MAX,
            },
            None => Duration::ZERO,
        }
    }

    /// Reset the policy state, forgetting all retained timestamps.
    pub fn reset(&mut self) {
        self.sent.clear();
    }
}

/// Throttling state for a single identity.
///
/// Keeps only the timestamp of the last accepted message and admits once a
/// fixed minimum interval has elapsed since it. The first message of an
/// identity is always admitted.
///
/// # Example
/// ```
/// use message_throttle::{AdmissionDecision, ThrottlingPolicy};
/// use std::time::{Duration, Instant};
///
/// let mut policy = ThrottlingPolicy::new(Duration::from_secs(10));
/// let now = Instant::now();
///
/// assert!(policy.register_event(now).is_allow());
/// assert!(policy.register_event(now + Duration::from_secs(9)).is_reject());
/// assert!(policy.register_event(now + Duration::from_secs(10)).is_allow());
/// ```
#[derive(Debug, Clone)]
pub struct ThrottlingPolicy {
    min_interval: Duration,
    last_sent: Option<Instant>,
}

impl ThrottlingPolicy {
    /// Create a new throttling policy.
    ///
    /// # Arguments
    /// * `min_interval` - Minimum spacing between accepted messages
    ///
    /// A zero interval admits everything.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent: None,
        }
    }

    /// Get the configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Timestamp of the last accepted message, if any.
    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }

    /// Check whether a message would be admitted right now.
    pub fn check(&self, now: Instant) -> AdmissionDecision {
        match self.last_sent {
            None => AdmissionDecision::Allow,
            Some(last) => {
                if now.saturating_duration_since(last) >= self.min_interval {
                    AdmissionDecision::Allow
                } else {
                    AdmissionDecision::Reject
                }
            }
        }
    }

    /// Register a message attempt and decide whether to admit it.
    ///
    /// On admission the last-sent timestamp is overwritten with `now`; a
    /// rejection leaves it untouched.
    pub fn register_event(&mut self, now: Instant) -> AdmissionDecision {
        match self.check(now) {
            AdmissionDecision::Allow => {
                self.last_sent = Some(now);
                AdmissionDecision::Allow
            }
            AdmissionDecision::Reject => AdmissionDecision::Reject,
        }
    }

    /// How long until the next message would be admitted.
    pub fn time_until_next_allowed(&self, now: Instant) -> Duration {
        match self.last_sent {
            None => Duration::ZERO,
            Some(last) => match last.checked_add(self.min_interval) {
                Some(ready) => ready.saturating_duration_since(now),
                None => Duration::MAX,
            },
        }
    }

    /// Reset the policy state, forgetting the last accepted message.
    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}
