//! Redis sliding window limiter
//!
//! One sorted set per key holds the admitted requests scored by their
//! timestamp in milliseconds. Pruning, counting and recording run in a
//! single script.

use async_trait::async_trait;
use redis::Script;
use uuid::Uuid;
use vc_core::errors::DomainResult;
use vc_core::services::verification::Limiter;
use vc_shared::WindowLimit;

use crate::cache::RedisClient;

const SLIDING_WINDOW_SCRIPT: &str = include_str!("lua/sliding_window.lua");

/// Sliding window limiter shared by every process using the same Redis
pub struct RedisSlidingWindowLimiter {
    client: RedisClient,
    window: WindowLimit,
    script: Script,
}

impl RedisSlidingWindowLimiter {
    pub fn new(client: RedisClient, window: WindowLimit) -> Self {
        Self {
            client,
            window,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        }
    }

    pub fn window(&self) -> WindowLimit {
        self.window
    }
}

#[async_trait]
impl Limiter for RedisSlidingWindowLimiter {
    async fn limit(&self, key: &str) -> DomainResult<bool> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        // Members must be unique so that requests in the same millisecond all count
        let member = format!("{}-{}", now_ms, Uuid::new_v4());
        let args = [
            self.window.window_ms.to_string(),
            self.window.limit.to_string(),
            now_ms.to_string(),
            member,
        ];

        let limited: i64 = self.client.run_script(&self.script, &[key], &args).await?;
        if limited == 1 {
            tracing::debug!(
                limit = self.window.limit,
                window_ms = self.window.window_ms,
                event = "rate_limited",
                "Request refused by sliding window"
            );
        }
        Ok(limited == 1)
    }
}
