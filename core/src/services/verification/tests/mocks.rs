//! Mock implementations for testing verification service

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::entities::code_entry::{CodeEntry, CodePolicy, SetStatus, VerifyStatus};
use crate::errors::{DomainError, DomainResult, NotifyError};
use crate::services::verification::traits::{CodeGenerator, CodeStore, Notifier};

/// In-memory store driving `CodeEntry` directly
pub struct MockCodeStore {
    pub entries: Arc<Mutex<HashMap<String, CodeEntry>>>,
    pub policy: CodePolicy,
    pub should_fail: bool,
}

impl MockCodeStore {
    pub fn new(should_fail: bool) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            policy: CodePolicy::default(),
            should_fail,
        }
    }

    pub async fn remaining_attempts(&self, key: &str) -> Option<u32> {
        self.entries
            .lock()
            .await
            .get(key)
            .map(|entry| entry.remaining_attempts())
    }
}

#[async_trait]
impl CodeStore for MockCodeStore {
    async fn set(&self, key: &str, code: &str) -> DomainResult<SetStatus> {
        if self.should_fail {
            return Err(DomainError::Storage {
                message: "store unavailable".to_string(),
            });
        }
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if !entry.is_expired(now) && entry.in_cooldown(&self.policy, now) {
                return Ok(SetStatus::TooSoon);
            }
        }
        entries.insert(key.to_string(), CodeEntry::new(code, &self.policy, now));
        Ok(SetStatus::Ok)
    }

    async fn verify(&self, key: &str, input_code: &str) -> DomainResult<VerifyStatus> {
        if self.should_fail {
            return Err(DomainError::Storage {
                message: "store unavailable".to_string(),
            });
        }
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let status = match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => entry.attempt(input_code),
            _ => VerifyStatus::NotFound,
        };
        if matches!(status, VerifyStatus::Match | VerifyStatus::NotFound) {
            entries.remove(key);
        }
        Ok(status)
    }
}

/// Notifier recording every delivery
pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<(String, Vec<String>, Vec<String>)>>>,
    pub should_fail: bool,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    /// Code of the most recent delivery
    pub async fn last_code(&self) -> Option<String> {
        self.sent
            .lock()
            .await
            .last()
            .and_then(|(_, args, _)| args.first().cloned())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), NotifyError> {
        if self.should_fail {
            return Err(NotifyError::Unavailable {
                provider: "mock".to_string(),
                message: "gateway down".to_string(),
            });
        }
        self.sent
            .lock()
            .await
            .push((template_id.to_string(), args.to_vec(), recipients.to_vec()));
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// Generator always returning the same code
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}
