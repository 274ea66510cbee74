//! Mock implementations for testing.
//!
//! This module provides test doubles for infrastructure adapters, enabling
//! controlled testing of admission behavior without real waiting.

pub mod clock;

pub use clock::MockClock;
