use std::sync::Arc;
use std::time::Duration;

use chat_relay::application::services::RateLimiter;

#[tokio::test(start_paused = true)]
async fn given_fresh_limiter_when_acquiring_then_accepts() {
    let limiter = RateLimiter::new(Duration::from_secs(1));
    assert!(limiter.try_acquire().await);
}

#[tokio::test(start_paused = true)]
async fn given_recent_request_when_acquiring_within_window_then_rejects() {
    let limiter = RateLimiter::new(Duration::from_secs(1));
    assert!(limiter.try_acquire().await);

    tokio::time::advance(Duration::from_millis(999)).await;
    assert!(!limiter.try_acquire().await);
}

#[tokio::test(start_paused = true)]
async fn given_window_elapsed_when_acquiring_then_accepts() {
    let limiter = RateLimiter::new(Duration::from_secs(1));
    assert!(limiter.try_acquire().await);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(limiter.try_acquire().await);
}

#[tokio::test(start_paused = true)]
async fn given_rejected_request_when_window_elapses_from_last_accepted_then_accepts() {
    let limiter = RateLimiter::new(Duration::from_secs(1));
    assert!(limiter.try_acquire().await);

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(!limiter.try_acquire().await);

    tokio::time::advance(Duration::from_millis(400)).await;
    assert!(limiter.try_acquire().await);
}

#[tokio::test(start_paused = true)]
async fn given_concurrent_requests_when_acquiring_then_exactly_one_is_accepted() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1)));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.try_acquire().await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn given_zero_window_when_acquiring_repeatedly_then_always_accepts() {
    let limiter = RateLimiter::new(Duration::ZERO);
    for _ in 0..5 {
        assert!(limiter.try_acquire().await);
    }
}
