//! The shared limiter contract.
//!
//! Both limiter components implement the same three-operation surface and
//! are interchangeable from the caller's point of view: pick a policy,
//! construct it, and drive it by identity.

use std::time::Duration;

/// Operation contract shared by the admission limiters.
///
/// Implementations never fail: every identity and every configuration maps
/// to a defined boolean or duration. A rejected admission is a normal
/// outcome, paired with a wait hint from `time_until_next_allowed` that the
/// caller may use for backoff scheduling.
pub trait RateLimiter<K> {
    /// Check whether `identity` could send a message right now.
    ///
    /// This is a peek, not a reservation: no capacity is consumed, and a
    /// positive answer does not guarantee a later `record_message` will
    /// succeed once the clock has advanced.
    fn can_send_message(&self, identity: &K) -> bool;

    /// Register a message attempt for `identity`.
    ///
    /// Returns true and consumes capacity iff the message is admitted;
    /// returns false with no state change otherwise. The check and the
    /// mutation happen atomically with respect to other operations on the
    /// same identity.
    fn record_message(&self, identity: &K) -> bool;

    /// How long `identity` must wait before a message would be admitted.
    ///
    /// Zero whenever `can_send_message` would return true.
    fn time_until_next_allowed(&self, identity: &K) -> Duration;

    /// Number of identities currently holding state in the limiter.
    fn tracked_identities(&self) -> usize;
}
