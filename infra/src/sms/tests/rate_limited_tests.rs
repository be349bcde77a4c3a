//! Unit tests for the rate limited notifier decorator

use std::sync::Arc;

use async_trait::async_trait;
use vc_core::errors::{DomainError, DomainResult, NotifyError};
use vc_core::services::verification::{Limiter, Notifier};

use crate::rate_limit::{LocalSlidingWindowLimiter, WindowLimit};
use crate::sms::{MockNotifier, RateLimitedNotifier};

struct BrokenLimiter;

#[async_trait]
impl Limiter for BrokenLimiter {
    async fn limit(&self, _key: &str) -> DomainResult<bool> {
        Err(DomainError::Storage {
            message: "connection reset".to_string(),
        })
    }
}

fn recipients(phone: &str) -> Vec<String> {
    vec![phone.to_string()]
}

#[test]
fn test_limit_key_format() {
    let notifier = RateLimitedNotifier::new(
        Arc::new(MockNotifier::new()),
        Arc::new(BrokenLimiter),
        "sms-limiter",
    );
    let recipients = vec!["15801088210".to_string(), "13800138000".to_string()];
    assert_eq!(
        notifier.limit_key("1877556", &recipients),
        "sms-limiter:1877556:15801088210,13800138000"
    );
}

#[tokio::test]
async fn test_limited_delivery_skips_backend() {
    let backend = MockNotifier::new();
    let limiter = LocalSlidingWindowLimiter::new(WindowLimit::new(2, 60_000), 10).unwrap();
    let notifier = RateLimitedNotifier::new(Arc::new(backend.clone()), Arc::new(limiter), "sms-limiter");
    let args = vec!["482913".to_string()];

    notifier.send("1877556", &args, &recipients("15801088210")).await.unwrap();
    notifier.send("1877556", &args, &recipients("15801088210")).await.unwrap();
    assert_eq!(
        notifier.send("1877556", &args, &recipients("15801088210")).await,
        Err(NotifyError::RateLimited)
    );
    assert_eq!(backend.call_count(), 2);

    // Another recipient has its own window
    notifier.send("1877556", &args, &recipients("13800138000")).await.unwrap();
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test]
async fn test_limiter_failure_is_reported() {
    let backend = MockNotifier::new();
    let notifier = RateLimitedNotifier::new(Arc::new(backend.clone()), Arc::new(BrokenLimiter), "sms-limiter");

    match notifier.send("1877556", &[], &recipients("15801088210")).await {
        Err(NotifyError::Limiter { message }) => assert!(message.contains("connection reset")),
        other => panic!("Expected limiter error, got {:?}", other),
    }
    assert_eq!(backend.call_count(), 0);
    assert_eq!(notifier.provider_name(), "mock");
}
