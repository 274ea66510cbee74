//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the
//! application layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the limiters to work with time without depending
/// on system clock implementation details. Infrastructure provides concrete
/// implementations (SystemClock, MockClock).
///
/// Each limiter operation reads the clock exactly once and threads that
/// single instant through its prune, decide, and mutate steps.
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}
