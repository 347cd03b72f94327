/// Rate limiting for link creation
///
/// Token bucket limiter shared by every `POST /api/shorten` request

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::metrics::RATE_LIMITED_REQUESTS;

#[derive(Clone)]
pub struct RateLimiter {
    /// None when unlimited
    limiter: Option<Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rps` requests per second (0 = unlimited)
    pub fn new(rps: u32) -> Self {
        let limiter = NonZeroU32::new(rps).map(|rps| {
            let quota = Quota::per_second(rps);
            Arc::new(GovernorRateLimiter::direct(quota))
        });
        Self { limiter }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// Returns `RateLimited` once the bucket is empty
    pub fn check(&self) -> Result<(), ApiError> {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                warn!("Shorten rate limit exceeded");
                RATE_LIMITED_REQUESTS.inc();
                return Err(ApiError::RateLimited);
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_rate_limiter_unlimited() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..100 {
            assert!(limiter.check().is_ok());
        }
        assert!(!limiter.is_enabled());
    }

    #[test]
    fn test_rate_limiter_burst() {
        let limiter = RateLimiter::new(10);
        for i in 0..10 {
            assert!(limiter.check().is_ok(), "Request {} should succeed", i);
        }
        assert_eq!(limiter.check(), Err(ApiError::RateLimited));
        assert!(limiter.is_enabled());
    }

    #[test]
    fn test_rate_limiter_refill() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());

        thread::sleep(Duration::from_millis(1100));
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn test_clones_share_bucket() {
        let limiter = RateLimiter::new(1);
        let clone = limiter.clone();
        assert!(limiter.check().is_ok());
        assert!(clone.check().is_err());
    }
}
