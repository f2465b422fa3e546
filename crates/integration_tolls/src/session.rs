//! Session-scoped toll state
//!
//! One [`TollSessionState`] is created at startup and shared by every toll
//! client for the lifetime of the process. It holds the quota circuit
//! breaker and the `(key, timestamp)` pair used to debounce failure logs.
//! The breaker is a plain atomic flag with no lock around the network call:
//! two concurrent passes may both see it open and both hit a 403.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

/// Circuit breaker and warning debounce shared across pricing passes
#[derive(Debug, Default)]
pub struct TollSessionState {
    disabled_for_session: AtomicBool,
    last_warn: Mutex<Option<(String, i64)>>,
}

impl TollSessionState {
    /// Create a fresh session with the breaker closed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether toll estimation has been turned off for this session
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled_for_session.load(Ordering::Relaxed)
    }

    /// Turn toll estimation off until the process restarts
    pub fn disable(&self) {
        self.disabled_for_session.store(true, Ordering::Relaxed);
    }

    /// Decide whether a failure should be logged loudly at `now_ms`
    ///
    /// Returns `true` and records the event when the key differs from the
    /// last loud one or the window has passed. Returns `false` for a repeat
    /// inside the window, leaving the recorded event untouched.
    pub fn should_warn_at(&self, key: &str, now_ms: i64, window: Duration) -> bool {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let mut last = self.last_warn.lock();

        let repeated = last
            .as_ref()
            .is_some_and(|(last_key, at)| last_key == key && now_ms - *at <= window_ms);
        if repeated {
            return false;
        }

        *last = Some((key.to_string(), now_ms));
        true
    }

    /// [`Self::should_warn_at`] with the current wall-clock time
    pub fn should_warn(&self, key: &str, window: Duration) -> bool {
        self.should_warn_at(key, chrono::Utc::now().timestamp_millis(), window)
    }
}
