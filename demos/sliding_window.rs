//! Demo: sliding-window admission over a simulated message stream.
//!
//! Five users send interleaved messages under a one-message-per-10-seconds
//! window, then the stream pauses and sends a second burst. Run with:
//!
//! ```sh
//! cargo run --example sliding_window
//! ```

use message_throttle::{RateLimiter, SlidingWindowLimiter};
use std::thread;
use std::time::Duration;

fn run_burst(limiter: &SlidingWindowLimiter<String>, range: std::ops::RangeInclusive<u32>) {
    for message_id in range {
        let user = format!("user{}", message_id % 5 + 1);
        let accepted = limiter.record_message(&user);
        let wait = limiter.time_until_next_allowed(&user);

        if accepted {
            println!("message {:2} | {} | ok", message_id, user);
        } else {
            println!(
                "message {:2} | {} | rejected, retry in {:.1}s",
                message_id,
                user,
                wait.as_secs_f64()
            );
        }

        thread::sleep(Duration::from_millis(300));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "message_throttle=debug".into()),
        )
        .init();

    let limiter = SlidingWindowLimiter::new(Duration::from_secs(10), 1);

    println!("=== message stream, first burst ===");
    run_burst(&limiter, 1..=10);

    println!("\nwaiting 4 seconds...\n");
    thread::sleep(Duration::from_secs(4));

    println!("=== message stream, second burst ===");
    run_burst(&limiter, 11..=20);

    let snapshot = limiter.metrics().snapshot();
    println!(
        "\n{} admitted, {} rejected ({:.0}% rejection rate)",
        snapshot.requests_allowed,
        snapshot.requests_rejected,
        snapshot.rejection_rate() * 100.0
    );
}
