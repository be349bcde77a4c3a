//! Notifier decorator gating deliveries through a limiter

use std::sync::Arc;

use async_trait::async_trait;
use vc_core::errors::NotifyError;
use vc_core::services::verification::{Limiter, Notifier};

/// Refuses deliveries once the limiter reports the key as limited.
///
/// The limiter key is `<prefix>:<template_id>:<recipients joined by ",">`.
pub struct RateLimitedNotifier {
    inner: Arc<dyn Notifier>,
    limiter: Arc<dyn Limiter>,
    prefix: String,
}

impl RateLimitedNotifier {
    pub fn new(inner: Arc<dyn Notifier>, limiter: Arc<dyn Limiter>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            limiter,
            prefix: prefix.into(),
        }
    }

    /// Limiter key for one delivery
    pub fn limit_key(&self, template_id: &str, recipients: &[String]) -> String {
        format!("{}:{}:{}", self.prefix, template_id, recipients.join(","))
    }
}

#[async_trait]
impl Notifier for RateLimitedNotifier {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), NotifyError> {
        let key = self.limit_key(template_id, recipients);
        let limited = self.limiter.limit(&key).await.map_err(|e| NotifyError::Limiter {
            message: e.to_string(),
        })?;

        if limited {
            tracing::warn!(
                template_id = template_id,
                recipients = recipients.len(),
                event = "dispatch_rate_limited",
                "Notification refused by rate limiter"
            );
            return Err(NotifyError::RateLimited);
        }

        self.inner.send(template_id, args, recipients).await
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
