//! Infrastructure layer - adapters behind the application ports.
//!
//! This layer provides:
//! - Clock adapters (system time vs mock)
//! - Storage implementation (sharded concurrent map)

pub mod clock;
pub mod storage;

/// Mock implementations for testing.
///
/// Provides controllable test doubles, most notably [`mocks::MockClock`],
/// for deterministic testing of time-based admission behavior. Always
/// available so downstream crates can drive limiters in their own tests.
pub mod mocks;
