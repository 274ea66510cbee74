//! # message-throttle
//!
//! Per-identity admission control for message streams.
//!
//! This crate decides, for each caller identity, whether a new message may
//! proceed right now, and if not, how long the caller must wait. Two
//! interchangeable limiters implement the same three-operation contract
//! under different policies:
//!
//! - [`SlidingWindowLimiter`]: tracks the exact timestamps of recent
//!   admitted messages inside a trailing time window and admits while the
//!   count of events still inside the window is below a cap.
//! - [`ThrottlingLimiter`]: tracks only the timestamp of the last admitted
//!   message and admits once a fixed minimum interval has elapsed.
//!
//! ## Quick Start
//!
//! ```rust
//! use message_throttle::{RateLimiter, SlidingWindowLimiter};
//! use std::time::Duration;
//!
//! // At most 3 messages per identity per 10-second window
//! let limiter = SlidingWindowLimiter::new(Duration::from_secs(10), 3);
//!
//! if limiter.record_message(&"user42") {
//!     // deliver the message
//! } else {
//!     let wait = limiter.time_until_next_allowed(&"user42");
//!     // schedule a retry after `wait`
//! }
//! ```
//!
//! ## Choosing a limiter
//!
//! Use the **sliding window** when bursts up to a cap are acceptable as
//! long as the rate over any trailing window stays bounded. It stores one
//! timestamp per admitted message (bounded by `max_requests` per identity)
//! and removes identities whose whole window has expired, so memory does
//! not grow with identity churn.
//!
//! Use **throttling** when messages must be evenly spaced. It stores a
//! single timestamp per identity and never removes entries: the map is
//! bounded by the number of distinct identities ever seen.
//!
//! ## Contract
//!
//! Both limiters implement [`RateLimiter`]:
//!
//! - `can_send_message` is a peek, not a reservation.
//! - `record_message` is the atomic check-then-admit step; a rejection
//!   leaves state untouched.
//! - `time_until_next_allowed` is zero exactly when `can_send_message`
//!   would return true, and otherwise reports the wait until capacity
//!   frees up.
//!
//! The operations never fail and never panic: unseen identities, zero
//! caps, and zero intervals all map to defined results. A cap of zero
//! simply denies all traffic; a zero interval admits everything.
//!
//! ## Concurrency
//!
//! Limiters are `Send + Sync` and designed to be shared behind an `Arc`.
//! Per-identity state lives in a sharded concurrent map; the
//! check-then-mutate step of `record_message` runs under the identity's
//! shard lock, so concurrent callers can never over-admit a single
//! identity, while different identities proceed in parallel.
//!
//! ## Deterministic testing
//!
//! Time is an injected dependency. Production limiters read
//! [`SystemClock`]; tests construct limiters with
//! [`mocks::MockClock`] and advance time explicitly:
//!
//! ```rust
//! use message_throttle::mocks::MockClock;
//! use message_throttle::{RateLimiter, SlidingWindowLimiter};
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! let clock = Arc::new(MockClock::new(Instant::now()));
//! let limiter = SlidingWindowLimiter::with_clock(Duration::from_secs(10), 1, clock.clone());
//!
//! assert!(limiter.record_message(&"a"));
//! assert!(!limiter.record_message(&"a"));
//!
//! clock.advance(Duration::from_secs(11));
//! assert!(limiter.record_message(&"a"));
//! ```
//!
//! ## Observability
//!
//! Each limiter carries [`Metrics`] with atomic counters for admitted and
//! rejected messages (and, for the sliding window, removed idle
//! identities). Decisions are also annotated with `tracing` events at
//! `trace`/`debug` level; the API itself returns plain values and is
//! logging-agnostic.

// Domain layer - pure per-identity state machines
pub mod domain;

// Application layer - limiters, contract, metrics
pub mod application;

// Infrastructure layer - clock and storage adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::policy::{AdmissionDecision, SlidingWindowPolicy, ThrottlingPolicy};

pub use application::{
    limiter::RateLimiter,
    metrics::{Metrics, MetricsSnapshot},
    ports::Clock,
    sliding_window::SlidingWindowLimiter,
    throttling::ThrottlingLimiter,
};

pub use infrastructure::clock::SystemClock;
pub use infrastructure::mocks;
pub use infrastructure::storage::ShardedStorage;
