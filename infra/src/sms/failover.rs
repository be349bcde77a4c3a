//! Timeout-driven failover across notifier providers
//!
//! Calls go to the current provider. After `threshold` consecutive timeouts
//! the next call rotates to the following provider (round robin). State is
//! two atomics; concurrent callers never block each other.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use vc_core::errors::{FailureKind, NotifyError};
use vc_core::services::verification::Notifier;

use crate::InfrastructureError;

/// Rule deciding how a delivery failure affects the failover state
pub type FailureClassifier = Arc<dyn Fn(&NotifyError) -> FailureKind + Send + Sync>;

/// Notifier rotating past providers whose calls keep timing out
pub struct TimeoutFailoverNotifier {
    providers: Vec<Arc<dyn Notifier>>,
    /// Index of the provider receiving calls
    idx: AtomicUsize,
    /// Consecutive timeouts observed on the current provider
    cnt: AtomicU32,
    threshold: u32,
    classifier: FailureClassifier,
    call_timeout: Option<Duration>,
}

impl TimeoutFailoverNotifier {
    /// Create a failover notifier over `providers`, in priority order
    ///
    /// # Errors
    ///
    /// `InfrastructureError::Config` when `providers` is empty or
    /// `threshold` is zero.
    pub fn new(
        providers: Vec<Arc<dyn Notifier>>,
        threshold: u32,
    ) -> Result<Self, InfrastructureError> {
        if providers.is_empty() {
            return Err(InfrastructureError::Config(
                "failover notifier needs at least one provider".to_string(),
            ));
        }
        if threshold == 0 {
            return Err(InfrastructureError::Config(
                "failover threshold must be at least 1".to_string(),
            ));
        }

        info!(
            providers = ?providers.iter().map(|p| p.provider_name()).collect::<Vec<_>>(),
            threshold = threshold,
            "Initializing timeout failover notifier"
        );

        Ok(Self {
            providers,
            idx: AtomicUsize::new(0),
            cnt: AtomicU32::new(0),
            threshold,
            classifier: Arc::new(NotifyError::kind),
            call_timeout: None,
        })
    }

    /// Replace the failure classification rule
    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Bound every provider call; an elapsed deadline counts as a timeout
    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Index of the provider currently receiving calls
    pub fn current_index(&self) -> usize {
        self.idx.load(Ordering::SeqCst)
    }

    pub fn consecutive_timeouts(&self) -> u32 {
        self.cnt.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub(crate) fn with_state(self, idx: usize, cnt: u32) -> Self {
        self.idx.store(idx, Ordering::SeqCst);
        self.cnt.store(cnt, Ordering::SeqCst);
        self
    }

    /// Pick the provider for this call, rotating when the threshold is reached
    ///
    /// Resetting the counter is the rotation ticket: among callers that see the
    /// threshold reached, only the one whose reset succeeds moves the index.
    fn select(&self) -> usize {
        let cnt = self.cnt.load(Ordering::SeqCst);
        if cnt < self.threshold {
            return self.idx.load(Ordering::SeqCst);
        }
        if self
            .cnt
            .compare_exchange(cnt, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return self.idx.load(Ordering::SeqCst);
        }

        let len = self.providers.len();
        let prev = match self
            .idx
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| Some((i + 1) % len))
        {
            Ok(prev) | Err(prev) => prev,
        };
        let next = (prev + 1) % len;
        warn!(
            from = self.providers[prev].provider_name(),
            to = self.providers[next].provider_name(),
            timeouts = cnt,
            event = "notifier_failover",
            "Switching notifier provider"
        );
        next
    }
}

#[async_trait]
impl Notifier for TimeoutFailoverNotifier {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), NotifyError> {
        let idx = self.select();
        let provider = &self.providers[idx];

        let result = match self.call_timeout {
            Some(deadline) => {
                match tokio::time::timeout(deadline, provider.send(template_id, args, recipients))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(NotifyError::Timeout {
                        provider: provider.provider_name().to_string(),
                    }),
                }
            }
            None => provider.send(template_id, args, recipients).await,
        };

        match &result {
            Ok(()) => self.cnt.store(0, Ordering::SeqCst),
            Err(e) => match (self.classifier)(e) {
                FailureKind::Timeout => {
                    let timeouts = self.cnt.fetch_add(1, Ordering::SeqCst) + 1;
                    warn!(
                        provider = provider.provider_name(),
                        timeouts = timeouts,
                        "Notifier call timed out"
                    );
                }
                kind => debug!(
                    provider = provider.provider_name(),
                    kind = ?kind,
                    error = %e,
                    "Notifier call failed without affecting failover"
                ),
            },
        }
        result
    }

    fn provider_name(&self) -> &str {
        self.providers[self.current_index()].provider_name()
    }
}
