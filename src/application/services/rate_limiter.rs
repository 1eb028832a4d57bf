use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits at most one request per `window`, measured from the last admitted request.
///
/// The cursor is global: every caller shares it.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` and moves the cursor if the window has elapsed.
    /// A rejected call leaves the cursor untouched.
    pub async fn try_acquire(&self) -> bool {
        let mut last_accepted = self.last_accepted.lock().await;
        let now = Instant::now();

        if let Some(last) = *last_accepted {
            if now.duration_since(last) < self.window {
                return false;
            }
        }

        *last_accepted = Some(now);
        true
    }
}
