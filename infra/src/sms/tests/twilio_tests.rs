//! Unit tests for the Twilio notifier

use reqwest::StatusCode;
use vc_core::errors::{FailureKind, NotifyError};
use vc_core::services::verification::Notifier;

use crate::sms::twilio::{classify_status, TwilioErrorResponse, TwilioMessageResponse};
use crate::sms::{TwilioConfig, TwilioNotifier};
use crate::InfrastructureError;

fn setup_test_config() -> TwilioConfig {
    TwilioConfig::new("ACtest_account_sid", "test_auth_token", "+15551234567")
}

#[test]
fn test_rejects_non_e164_sender() {
    let config = TwilioConfig::new("ACtest_account_sid", "test_auth_token", "5551234567");
    assert!(matches!(
        TwilioNotifier::new(config),
        Err(InfrastructureError::Config(_))
    ));
}

#[test]
fn test_render_default_template() {
    let notifier = TwilioNotifier::new(setup_test_config()).unwrap();
    let body = notifier.render("1877556", &["482913".to_string()]).unwrap();
    assert!(body.contains("482913"));
    assert!(!body.contains("{0}"));
}

#[test]
fn test_render_positional_arguments() {
    let config = setup_test_config().with_template("welcome", "Hi {0}, your code is {1}");
    let notifier = TwilioNotifier::new(config).unwrap();
    let body = notifier
        .render("welcome", &["Ada".to_string(), "135790".to_string()])
        .unwrap();
    assert_eq!(body, "Hi Ada, your code is 135790");
}

#[test]
fn test_unknown_template_is_rejected() {
    let notifier = TwilioNotifier::new(setup_test_config()).unwrap();
    let err = notifier.render("missing", &[]).unwrap_err();
    assert!(matches!(err, NotifyError::Rejected { .. }));
    assert_eq!(err.kind(), FailureKind::HardFailure);
}

#[test]
fn test_status_classification() {
    let throttled = classify_status(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests".to_string());
    assert_eq!(throttled.kind(), FailureKind::Transient);

    let outage = classify_status(StatusCode::SERVICE_UNAVAILABLE, "down".to_string());
    assert!(matches!(outage, NotifyError::Unavailable { .. }));

    let bad_request = classify_status(StatusCode::BAD_REQUEST, "invalid To".to_string());
    match bad_request {
        NotifyError::Rejected { provider, message } => {
            assert_eq!(provider, "twilio");
            assert_eq!(message, "HTTP 400: invalid To");
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[test]
fn test_reply_parsing() {
    let ok: TwilioMessageResponse =
        serde_json::from_str(r#"{"sid":"SM123","status":"queued","to":"+15558675310"}"#).unwrap();
    assert_eq!(ok.sid, "SM123");
    assert_eq!(ok.status.as_deref(), Some("queued"));

    let err: TwilioErrorResponse = serde_json::from_str(
        r#"{"code":21211,"message":"The 'To' number is not a valid phone number.","status":400}"#,
    )
    .unwrap();
    assert_eq!(err.code, Some(21211));
}

#[test]
fn test_formatted_recipient_is_posted_normalized() {
    let notifier = TwilioNotifier::new(setup_test_config()).unwrap();
    let form = notifier.message_form("+1 415-555-2671", "Your code is 482913");
    assert_eq!(form[0], ("To", "+14155552671".to_string()));
    assert_eq!(form[1], ("From", "+15551234567".to_string()));
    assert_eq!(form[2], ("Body", "Your code is 482913".to_string()));
}

#[tokio::test]
async fn test_invalid_recipient_is_not_sent() {
    let notifier = TwilioNotifier::new(setup_test_config()).unwrap();
    let result = notifier
        .send("1877556", &["482913".to_string()], &["15801088210".to_string()])
        .await;
    assert_eq!(
        result,
        Err(NotifyError::InvalidRecipient {
            recipient: "158****8210".to_string()
        })
    );
}

#[tokio::test]
async fn test_unreachable_api_is_unavailable() {
    let mut config = setup_test_config();
    config.api_base = "http://127.0.0.1:9".to_string();
    config.request_timeout_secs = 2;
    let notifier = TwilioNotifier::new(config).unwrap();

    let result = notifier
        .send("1877556", &["482913".to_string()], &["+14155552671".to_string()])
        .await;
    assert!(matches!(
        result,
        Err(NotifyError::Unavailable { .. }) | Err(NotifyError::Timeout { .. })
    ));
}
