//! Application layer - orchestration of domain logic.
//!
//! This layer drives the per-identity admission state machines and manages
//! the runtime behavior:
//! - The shared limiter contract (`RateLimiter`)
//! - The two limiter components (sliding window, throttling)
//! - Observability metrics
//!
//! ## Ports
//!
//! The application layer defines the `Clock` port that infrastructure
//! adapters implement. This keeps admission decisions independent from the
//! system clock and deterministic under test.

pub mod limiter;
pub mod metrics;
pub mod ports;
pub mod sliding_window;
pub mod throttling;
