//! Unit tests for the mock notifier

use vc_core::errors::NotifyError;
use vc_core::services::verification::Notifier;

use crate::sms::{MockNotifier, SentMessage};

#[tokio::test]
async fn test_records_each_recipient() {
    let notifier = MockNotifier::new();
    let recipients = vec!["15801088210".to_string(), "+14155552671".to_string()];

    notifier
        .send("1877556", &["482913".to_string()], &recipients)
        .await
        .unwrap();

    let sent = notifier.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        SentMessage {
            template_id: "1877556".to_string(),
            args: vec!["482913".to_string()],
            recipient: "15801088210".to_string(),
        }
    );
    assert_eq!(
        notifier.last_code_for("+14155552671").await,
        Some("482913".to_string())
    );
    assert_eq!(notifier.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_recipient_is_masked() {
    let notifier = MockNotifier::new();
    let result = notifier
        .send("1877556", &["482913".to_string()], &["not-a-phone-number".to_string()])
        .await;

    assert_eq!(
        result,
        Err(NotifyError::InvalidRecipient {
            recipient: "not****mber".to_string()
        })
    );
    assert!(notifier.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_injected_failure_can_be_cleared() {
    let notifier = MockNotifier::named("backup").with_failure(NotifyError::Timeout {
        provider: "backup".to_string(),
    });
    let recipients = vec!["15801088210".to_string()];

    assert!(notifier.send("1877556", &[], &recipients).await.is_err());

    notifier.set_failure(None).await;
    notifier.send("1877556", &[], &recipients).await.unwrap();

    assert_eq!(notifier.call_count(), 2);
    assert_eq!(notifier.sent_messages().await.len(), 1);
    assert_eq!(notifier.provider_name(), "backup");
}
