//! Mock notifier for development and testing
//!
//! Logs deliveries with masked recipients instead of sending them, and keeps
//! a record of every message for inspection. A failure can be injected and
//! an artificial latency added to exercise the failover path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};
use vc_core::errors::NotifyError;
use vc_core::services::verification::Notifier;
use vc_shared::phone::{is_valid_phone, mask_phone_number};

/// A delivery recorded by [`MockNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub template_id: String,
    pub args: Vec<String>,
    pub recipient: String,
}

/// Mock notifier for development and testing
#[derive(Clone)]
pub struct MockNotifier {
    name: String,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failure: Arc<Mutex<Option<NotifyError>>>,
    delay: Option<Duration>,
    call_count: Arc<AtomicU64>,
}

impl MockNotifier {
    /// Create a new mock notifier named `mock`
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock notifier reporting `name` as its provider
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            delay: None,
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Sleep for `delay` before every delivery
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every delivery with `error`
    pub fn with_failure(self, error: NotifyError) -> Self {
        Self {
            failure: Arc::new(Mutex::new(Some(error))),
            ..self
        }
    }

    /// Change the injected failure; `None` restores normal delivery
    pub async fn set_failure(&self, error: Option<NotifyError>) {
        *self.failure.lock().await = error;
    }

    /// Number of `send` calls, failed ones included
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every successful delivery so far
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// First argument of the latest delivery to `recipient`
    pub async fn last_code_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|message| message.recipient == recipient)
            .and_then(|message| message.args.first().cloned())
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
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
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failure.lock().await.clone() {
            warn!(provider = %self.name, error = %error, "Mock notifier simulating failure");
            return Err(error);
        }

        if let Some(invalid) = recipients.iter().find(|r| !is_valid_phone(r)) {
            return Err(NotifyError::InvalidRecipient {
                recipient: mask_phone_number(invalid),
            });
        }

        let mut sent = self.sent.lock().await;
        for recipient in recipients {
            info!(
                target: "sms_service",
                provider = %self.name,
                template_id = template_id,
                phone = %mask_phone_number(recipient),
                "Mock SMS delivered"
            );
            sent.push(SentMessage {
                template_id: template_id.to_string(),
                args: args.to_vec(),
                recipient: recipient.clone(),
            });
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
