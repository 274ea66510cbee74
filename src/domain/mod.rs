//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the admission
//! control system:
//! - Per-identity admission state machines (sliding-window log, throttling)
//! - Admission decisions
//!
//! All types in this layer are pure and easily testable.

pub mod policy;
