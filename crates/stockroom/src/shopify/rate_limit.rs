use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Platform-documented rate limits.
pub mod rate_limits {
    /// Shopify REST Admin API: 2 requests/second standard, 4 with bursting
    /// allowance on most plans. We pace at 4/s with no extra burst.
    pub const SHOPIFY_DEFAULT_RPS: u32 = 4;
    /// Burst size: every request waits its turn.
    pub const SHOPIFY_DEFAULT_BURST: u32 = 1;
}

/// A token-bucket rate limiter for API requests.
///
/// One limiter exists per client instance (per shop); limiters are not shared
/// across shops. Cloning shares the underlying bucket.
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a rate limiter allowing `requests_per_second` with the given
    /// burst size. Zero values default to 1.
    pub fn new(requests_per_second: u32, burst: u32) -> Self {
        let one = NonZeroU32::MIN;
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(one);
        let burst = NonZeroU32::new(burst).unwrap_or(one);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps).allow_burst(burst));

        Self {
            inner: Arc::new(rate_limiter),
        }
    }

    /// Wait until a request is allowed by the rate limiter.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn zero_arguments_default_to_one() {
        let _limiter = ApiRateLimiter::new(0, 0);
    }

    #[tokio::test]
    async fn first_request_is_nearly_instant() {
        let limiter = ApiRateLimiter::new(100, 1);
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn throttles_after_burst() {
        // 2 rps, burst 1: the second wait should not complete before the first.
        let limiter = ApiRateLimiter::new(2, 1);
        let start = Instant::now();
        limiter.wait().await;
        let after_first = start.elapsed();
        limiter.wait().await;
        let after_second = start.elapsed();
        assert!(after_second >= after_first);
        assert!(after_second < Duration::from_secs(5));
    }
}
