//! In-process sliding window limiter

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use vc_core::errors::DomainResult;
use vc_core::services::verification::Limiter;
use vc_shared::WindowLimit;

use crate::InfrastructureError;

/// Sliding window limiter for single-process deployments.
///
/// Keeps the admitted timestamps of each key in a deque; the key set itself
/// is bounded by an LRU, so an evicted key starts over with an empty window.
pub struct LocalSlidingWindowLimiter {
    windows: Mutex<LruCache<String, VecDeque<Instant>>>,
    window: WindowLimit,
}

impl LocalSlidingWindowLimiter {
    /// Create a limiter tracking at most `capacity` keys
    pub fn new(window: WindowLimit, capacity: usize) -> Result<Self, InfrastructureError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            InfrastructureError::Config("local limiter capacity must be positive".to_string())
        })?;
        Ok(Self {
            windows: Mutex::new(LruCache::new(capacity)),
            window,
        })
    }

    pub fn window(&self) -> WindowLimit {
        self.window
    }
}

#[async_trait]
impl Limiter for LocalSlidingWindowLimiter {
    async fn limit(&self, key: &str) -> DomainResult<bool> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let span = self.window.window();

        let timestamps = windows.get_or_insert_mut(key.to_string(), VecDeque::new);
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= span {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.window.limit as usize {
            return Ok(true);
        }
        timestamps.push_back(now);
        Ok(false)
    }
}
