//! Demo: throttled admission over a simulated message stream.
//!
//! Five users send interleaved messages spaced by a 10-second minimum
//! interval, then the stream pauses long enough for every interval to
//! elapse and sends a second burst. Run with:
//!
//! ```sh
//! cargo run --example throttling
//! ```

use message_throttle::{RateLimiter, ThrottlingLimiter};
use std::thread;
use std::time::Duration;

fn run_burst(limiter: &ThrottlingLimiter<String>, range: std::ops::RangeInclusive<u32>) {
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

    let limiter = ThrottlingLimiter::new(Duration::from_secs(10));

    println!("=== message stream, first burst ===");
    run_burst(&limiter, 1..=10);

    println!("\nwaiting 10 seconds for intervals to elapse...\n");
    thread::sleep(Duration::from_secs(10));

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
