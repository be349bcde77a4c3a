//! In-process code store
//!
//! One `tokio::sync::Mutex` guards an LRU of entries. No `.await` happens
//! while the lock is held, so a cancelled call never leaves a partial update.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use vc_core::domain::entities::code_entry::{CodeEntry, CodePolicy, SetStatus, VerifyStatus};
use vc_core::errors::DomainResult;
use vc_core::services::verification::CodeStore;

use crate::InfrastructureError;

/// Code store for single-process deployments
pub struct LocalCodeStore {
    entries: Mutex<LruCache<String, CodeEntry>>,
    policy: CodePolicy,
}

impl LocalCodeStore {
    /// Create a store holding at most `capacity` entries
    pub fn new(policy: CodePolicy, capacity: usize) -> Result<Self, InfrastructureError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            InfrastructureError::Config("local code store capacity must be positive".to_string())
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            policy,
        })
    }

    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Number of tracked entries, expired ones included until touched
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CodeStore for LocalCodeStore {
    async fn set(&self, key: &str, code: &str) -> DomainResult<SetStatus> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        if let Some(entry) = entries.peek(key) {
            if !entry.is_expired(now) && entry.in_cooldown(&self.policy, now) {
                return Ok(SetStatus::TooSoon);
            }
        }

        entries.put(key.to_string(), CodeEntry::new(code, &self.policy, now));
        Ok(SetStatus::Ok)
    }

    async fn verify(&self, key: &str, input_code: &str) -> DomainResult<VerifyStatus> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let expired = match entries.peek(key) {
            Some(entry) => entry.is_expired(now),
            None => return Ok(VerifyStatus::NotFound),
        };
        if expired {
            entries.pop(key);
            return Ok(VerifyStatus::NotFound);
        }

        let status = match entries.get_mut(key) {
            Some(entry) => entry.attempt(input_code),
            None => VerifyStatus::NotFound,
        };
        if status == VerifyStatus::Match {
            entries.pop(key);
        }
        Ok(status)
    }
}
