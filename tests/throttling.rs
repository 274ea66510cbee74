//! Integration tests for the throttling limiter, driven by `MockClock`.

use message_throttle::mocks::MockClock;
use message_throttle::{RateLimiter, ThrottlingLimiter};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn limiter(interval: Duration) -> (ThrottlingLimiter<&'static str>, Arc<MockClock>) {
    let clock = Arc::new(MockClock::new(Instant::now()));
    let limiter = ThrottlingLimiter::with_clock(interval, clock.clone());
    (limiter, clock)
}

#[test]
fn test_minimum_interval_scenario() {
    // min_interval=10: accept at t=0, reject at t=9.9, accept at t=10.0
    let (limiter, clock) = limiter(Duration::from_secs(10));

    assert!(limiter.record_message(&"B"));

    clock.advance(Duration::from_millis(9_900));
    assert!(!limiter.record_message(&"B"));

    clock.advance(Duration::from_millis(100));
    assert!(limiter.record_message(&"B"));
}

#[test]
fn test_accepted_messages_are_spaced() {
    let (limiter, clock) = limiter(Duration::from_secs(10));
    let mut accepted_at = vec![];
    let mut elapsed = Duration::ZERO;

    // Attempt every 3 seconds for a minute
    for _ in 0..20 {
        if limiter.record_message(&"B") {
            accepted_at.push(elapsed);
        }
        clock.advance(Duration::from_secs(3));
        elapsed += Duration::from_secs(3);
    }

    for pair in accepted_at.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(10));
    }
}

#[test]
fn test_wait_time_counts_down() {
    let (limiter, clock) = limiter(Duration::from_secs(10));

    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::ZERO);
    limiter.record_message(&"B");

    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::from_secs(10));

    clock.advance(Duration::from_secs(4));
    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::from_secs(6));

    clock.advance(Duration::from_secs(6));
    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::ZERO);
}

#[test]
fn test_wait_time_consistency() {
    let (limiter, clock) = limiter(Duration::from_secs(10));

    assert!(limiter.can_send_message(&"B"));
    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::ZERO);

    limiter.record_message(&"B");
    assert!(!limiter.can_send_message(&"B"));
    assert!(limiter.time_until_next_allowed(&"B") > Duration::ZERO);

    clock.advance(Duration::from_secs(10));
    assert!(limiter.can_send_message(&"B"));
    assert_eq!(limiter.time_until_next_allowed(&"B"), Duration::ZERO);
}

#[test]
fn test_rejection_does_not_extend_interval() {
    let (limiter, clock) = limiter(Duration::from_secs(10));

    limiter.record_message(&"B");

    // Hammering while blocked must not push the next slot further out
    for _ in 0..5 {
        clock.advance(Duration::from_secs(1));
        assert!(!limiter.record_message(&"B"));
    }

    clock.advance(Duration::from_secs(5));
    assert!(limiter.record_message(&"B"));
}

#[test]
fn test_entries_survive_aging() {
    let (limiter, clock) = limiter(Duration::from_secs(1));

    limiter.record_message(&"B");
    assert_eq!(limiter.tracked_identities(), 1);

    // Throttling state is overwritten, never pruned
    clock.advance(Duration::from_secs(3600));
    assert!(limiter.can_send_message(&"B"));
    assert_eq!(limiter.tracked_identities(), 1);
}

#[test]
fn test_zero_interval_admits_everything() {
    let (limiter, _clock) = limiter(Duration::ZERO);

    for _ in 0..10 {
        assert!(limiter.record_message(&"B"));
    }
    assert_eq!(limiter.metrics().requests_rejected(), 0);
}

#[test]
fn test_identities_do_not_interfere() {
    let (limiter, _clock) = limiter(Duration::from_secs(10));

    assert!(limiter.record_message(&"X"));
    assert!(!limiter.record_message(&"X"));

    assert!(limiter.can_send_message(&"Y"));
    assert!(limiter.record_message(&"Y"));
    assert_eq!(limiter.time_until_next_allowed(&"Y"), Duration::from_secs(10));
}

#[test]
fn test_metrics_reflect_traffic() {
    let (limiter, clock) = limiter(Duration::from_secs(10));

    limiter.record_message(&"B");
    limiter.record_message(&"B");
    clock.advance(Duration::from_secs(10));
    limiter.record_message(&"B");

    let snapshot = limiter.metrics().snapshot();
    assert_eq!(snapshot.requests_allowed, 2);
    assert_eq!(snapshot.requests_rejected, 1);
    assert_eq!(snapshot.total_requests(), 3);
}

#[test]
fn test_shared_across_threads() {
    use std::thread;

    let limiter = Arc::new(ThrottlingLimiter::new(Duration::from_secs(60)));
    let mut handles = vec![];

    for t in 0..4 {
        let limiter = Arc::clone(&limiter);
        handles.push(thread::spawn(move || {
            let identity = format!("user{}", t);
            let mut allowed = 0;
            for _ in 0..25 {
                if limiter.record_message(&identity) {
                    allowed += 1;
                }
            }
            allowed
        }));
    }

    for handle in handles {
        // Each identity admits exactly one message inside the interval
        assert_eq!(handle.join().unwrap(), 1);
    }
    assert_eq!(limiter.tracked_identities(), 4);
}
