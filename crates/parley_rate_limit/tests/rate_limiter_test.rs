//! Behavioural tests for the fixed-window rate limiter.

use parley_rate_limit::{Quota, RateLimitErrorKind, RateLimiter, spawn_sweeper};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn six_per_minute() -> Quota {
    "6/minute".parse().expect("valid quota")
}

#[test]
fn test_allows_exactly_quota_then_rejects() {
    let limiter = RateLimiter::default();
    let quota = six_per_minute();
    let start = Instant::now();

    for i in 0..6 {
        let at = start + Duration::from_secs(i * 5);
        assert!(limiter.check_at("10.0.0.1", &quota, at).is_ok(), "request {i}");
    }

    let err = limiter
        .check_at("10.0.0.1", &quota, start + Duration::from_secs(40))
        .unwrap_err();
    match err.kind() {
        RateLimitErrorKind::LimitExceeded {
            client,
            limit,
            retry_after_secs,
        } => {
            assert_eq!(client, "10.0.0.1");
            assert_eq!(limit, "6/m");
            assert_eq!(*retry_after_secs, 20);
        }
        other => panic!("unexpected error kind: {other}"),
    }
}

#[test]
fn test_allows_again_after_window_elapses() {
    let limiter = RateLimiter::default();
    let quota = six_per_minute();
    let start = Instant::now();

    for _ in 0..7 {
        let _ = limiter.check_at("10.0.0.1", &quota, start);
    }
    assert!(limiter.check_at("10.0.0.1", &quota, start).is_err());

    let next_window = start + Duration::from_secs(60);
    assert!(limiter.check_at("10.0.0.1", &quota, next_window).is_ok());
    assert_eq!(limiter.remaining_at("10.0.0.1", &quota, next_window), 5);
}

#[test]
fn test_rejected_checks_still_count() {
    let limiter = RateLimiter::default();
    let quota = Quota::per_minute(1).unwrap();
    let start = Instant::now();

    assert!(limiter.check_at("c", &quota, start).is_ok());
    // Hammering inside the window neither resets it nor earns quota back.
    for s in 1..60 {
        assert!(
            limiter
                .check_at("c", &quota, start + Duration::from_secs(s))
                .is_err()
        );
    }
    assert!(
        limiter
            .check_at("c", &quota, start + Duration::from_secs(60))
            .is_ok()
    );
}

#[test]
fn test_exempt_clients_always_pass() {
    let limiter = RateLimiter::new(["127.0.0.1", "10.1.1.1"]);
    let quota = Quota::per_minute(1).unwrap();

    for _ in 0..1_000 {
        assert!(limiter.check("127.0.0.1", &quota).is_ok());
    }
    assert_eq!(limiter.tracked_windows(), 0);
    assert_eq!(limiter.remaining("10.1.1.1", &quota), 1);
}

#[test]
fn test_clients_are_counted_independently() {
    let limiter = RateLimiter::default();
    let quota = Quota::per_minute(1).unwrap();

    assert!(limiter.check("alice", &quota).is_ok());
    assert!(limiter.check("bob", &quota).is_ok());
    assert!(limiter.check("alice", &quota).is_err());
}

#[test]
fn test_quotas_are_counted_independently() {
    let limiter = RateLimiter::default();
    let chat = six_per_minute();
    let status: Quota = "60/minute".parse().unwrap();
    let start = Instant::now();

    for _ in 0..6 {
        assert!(limiter.check_at("client", &chat, start).is_ok());
    }
    assert!(limiter.check_at("client", &chat, start).is_err());
    assert!(limiter.check_at("client", &status, start).is_ok());
    assert_eq!(limiter.remaining_at("client", &status, start), 59);
}

#[test]
fn test_concurrent_checks_from_one_client_are_exact() {
    let limiter = Arc::new(RateLimiter::default());
    let quota = Quota::per_minute(100).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            std::thread::spawn(move || {
                (0..25)
                    .filter(|_| limiter.check("shared", &quota).is_ok())
                    .count()
            })
        })
        .collect();

    let allowed: usize = handles
        .into_iter()
        .map(|h| h.join().expect("thread finished"))
        .sum();
    assert_eq!(allowed, 100);
}

#[test]
fn test_purge_expired_drops_only_stale_windows() {
    let limiter = RateLimiter::default();
    let minute = Quota::per_minute(5).unwrap();
    let hour: Quota = "5/hour".parse().unwrap();
    let start = Instant::now();

    limiter.check_at("a", &minute, start).unwrap();
    limiter.check_at("b", &hour, start).unwrap();
    assert_eq!(limiter.tracked_windows(), 2);

    assert_eq!(limiter.purge_expired(start + Duration::from_secs(61)), 1);
    assert_eq!(limiter.tracked_windows(), 1);
    assert_eq!(limiter.remaining_at("b", &hour, start), 4);
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_purges_in_background() {
    let limiter = Arc::new(RateLimiter::default());
    let quota = Quota::new(1, Duration::from_millis(1)).unwrap();
    limiter.check("short-lived", &quota).unwrap();
    std::thread::sleep(Duration::from_millis(5));

    let sweeper = spawn_sweeper(Arc::clone(&limiter), Duration::from_secs(30));
    tokio::time::sleep(Duration::from_secs(31)).await;
    tokio::task::yield_now().await;

    assert_eq!(limiter.tracked_windows(), 0);
    sweeper.abort();
}
