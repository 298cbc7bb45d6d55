//! Advisory tracking of the server's rate-limit window.
//!
//! The server is the only enforcer. The tracker mirrors what the last
//! response reported so callers can inspect it and so exhaustion shows up in
//! the logs, but it never delays or rejects a request.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use omi_core::RateLimitStatus;
use reqwest::header::HeaderMap;

/// Requests left in the current window.
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
/// Unix time (seconds) at which the window resets.
pub const HEADER_RESET: &str = "x-ratelimit-reset";
/// Seconds to wait after a 429.
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Last known rate-limit state of one client.
///
/// Both fields live behind a single mutex so a reader never sees the
/// remaining count of one response paired with the reset time of another.
/// Concurrent responses are last-writer-wins.
#[derive(Debug)]
pub struct RateLimitTracker {
    ceiling: i64,
    state: Mutex<RateLimitStatus>,
}

impl RateLimitTracker {
    /// Start with `ceiling` requests remaining and an unknown reset time.
    pub fn new(ceiling: i64) -> Self {
        Self {
            ceiling,
            state: Mutex::new(RateLimitStatus {
                remaining: ceiling,
                reset_at: 0,
            }),
        }
    }

    /// Current snapshot. Never performs I/O.
    pub fn status(&self) -> RateLimitStatus {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pre-request hook.
    ///
    /// When the window is exhausted and resets in the future, returns how
    /// long a polite caller would wait and logs it. The request still goes
    /// out.
    pub fn check_before_request(&self, now: i64) -> Option<Duration> {
        let status = self.status();
        if status.remaining > 0 || status.reset_at <= now {
            return None;
        }

        let wait = Duration::from_secs((status.reset_at - now).unsigned_abs());
        tracing::warn!(
            reset_at = status.reset_at,
            wait_secs = wait.as_secs(),
            "Rate limit reached. Waiting {:?} before retry is advised",
            wait
        );
        Some(wait)
    }

    /// Post-response hook for successful responses.
    ///
    /// Each header is parsed independently; a missing or unparseable value
    /// resets the field to its default (the ceiling for remaining, 0 for the
    /// reset time) rather than keeping the previous value.
    pub fn record_success(&self, headers: &HeaderMap) {
        let remaining = header_i64(headers, HEADER_REMAINING).unwrap_or(self.ceiling);
        let reset_at = header_i64(headers, HEADER_RESET).unwrap_or(0);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.remaining = remaining;
        state.reset_at = reset_at;
    }

    /// Post-response hook for error responses.
    ///
    /// Only headers that are present and parseable overwrite the stored
    /// values.
    pub fn record_failure(&self, headers: &HeaderMap) {
        let remaining = header_i64(headers, HEADER_REMAINING);
        let reset_at = header_i64(headers, HEADER_RESET);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(remaining) = remaining {
            state.remaining = remaining;
        }
        if let Some(reset_at) = reset_at {
            state.reset_at = reset_at;
        }
    }
}

/// Seconds from a `retry-after` header given in delta-seconds form.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    header_str(headers, HEADER_RETRY_AFTER)?.parse().ok()
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    header_str(headers, name)?.parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_initial_state() {
        let tracker = RateLimitTracker::new(100);
        assert_eq!(
            tracker.status(),
            RateLimitStatus {
                remaining: 100,
                reset_at: 0
            }
        );
    }

    #[test]
    fn test_success_headers_update_state() {
        let tracker = RateLimitTracker::new(100);
        tracker.record_success(&headers(&[
            (HEADER_REMAINING, "7"),
            (HEADER_RESET, "1700000000"),
        ]));
        assert_eq!(tracker.status().remaining, 7);
        assert_eq!(tracker.status().reset_at, 1_700_000_000);
    }

    #[test]
    fn test_success_without_headers_resets_to_defaults() {
        let tracker = RateLimitTracker::new(100);
        tracker.record_success(&headers(&[(HEADER_REMAINING, "3"), (HEADER_RESET, "42")]));
        tracker.record_success(&HeaderMap::new());
        assert_eq!(
            tracker.status(),
            RateLimitStatus {
                remaining: 100,
                reset_at: 0
            }
        );
    }

    #[test]
    fn test_success_with_garbage_headers_resets_to_defaults() {
        let tracker = RateLimitTracker::new(50);
        tracker.record_success(&headers(&[(HEADER_REMAINING, "lots"), (HEADER_RESET, "soon")]));
        assert_eq!(tracker.status().remaining, 50);
        assert_eq!(tracker.status().reset_at, 0);
    }

    #[test]
    fn test_failure_only_overwrites_present_headers() {
        let tracker = RateLimitTracker::new(100);
        tracker.record_success(&headers(&[(HEADER_REMAINING, "9"), (HEADER_RESET, "500")]));

        tracker.record_failure(&headers(&[(HEADER_REMAINING, "0")]));
        assert_eq!(tracker.status().remaining, 0);
        assert_eq!(tracker.status().reset_at, 500);

        tracker.record_failure(&HeaderMap::new());
        assert_eq!(tracker.status().remaining, 0);
        assert_eq!(tracker.status().reset_at, 500);
    }

    #[test]
    fn test_check_is_advisory() {
        let tracker = RateLimitTracker::new(100);
        assert_eq!(tracker.check_before_request(1_000), None);

        tracker.record_failure(&headers(&[(HEADER_REMAINING, "0"), (HEADER_RESET, "1030")]));
        assert_eq!(
            tracker.check_before_request(1_000),
            Some(Duration::from_secs(30))
        );

        // Reset time already passed.
        assert_eq!(tracker.check_before_request(2_000), None);
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(retry_after_secs(&headers(&[(HEADER_RETRY_AFTER, "30")])), Some(30));
        assert_eq!(retry_after_secs(&headers(&[(HEADER_RETRY_AFTER, "tomorrow")])), None);
        assert_eq!(retry_after_secs(&HeaderMap::new()), None);
    }

    #[test]
    fn test_numeric_headers_are_whole_integers_only() {
        // Surrounding whitespace is tolerated; fractions and trailing text are not.
        assert_eq!(retry_after_secs(&headers(&[(HEADER_RETRY_AFTER, " 30 ")])), Some(30));
        assert_eq!(retry_after_secs(&headers(&[(HEADER_RETRY_AFTER, "30.5")])), None);
        assert_eq!(retry_after_secs(&headers(&[(HEADER_RETRY_AFTER, "30s")])), None);

        let tracker = RateLimitTracker::new(100);
        tracker.record_success(&headers(&[(HEADER_REMAINING, "7 "), (HEADER_RESET, "12.5")]));
        assert_eq!(tracker.status().remaining, 7);
        assert_eq!(tracker.status().reset_at, 0);
    }
}
