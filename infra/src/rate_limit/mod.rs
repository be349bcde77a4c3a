//! Sliding window rate limiters
//!
//! A limiter admits at most `limit` requests per key inside any trailing
//! window. Refused requests are not recorded, so a caller hammering a
//! limited key does not extend its own penalty.

pub mod local_limiter;
pub mod redis_limiter;


use async_trait::async_trait;
use vc_core::errors::DomainResult;
use vc_core::services::verification::Limiter;

pub use local_limiter::LocalSlidingWindowLimiter;
pub use redis_limiter::RedisSlidingWindowLimiter;
pub use vc_shared::WindowLimit;

/// Limiter that admits everything; used when rate limiting is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl Limiter for Unlimited {
    async fn limit(&self, _key: &str) -> DomainResult<bool> {
        Ok(false)
    }
}
