//! Twilio notifier
//!
//! Sends one SMS per recipient through the Twilio Messages REST API.
//!
//! ## Features
//!
//! - Message bodies rendered from templates with `{0}`, `{1}` ... placeholders
//! - E.164 recipient validation
//! - Failures mapped onto the notifier error vocabulary; no internal retries,
//!   the failover layer decides what happens next
//! - Security: Phone number masking in logs

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info};
use vc_core::errors::NotifyError;
use vc_core::services::verification::{Notifier, DEFAULT_TEMPLATE_ID};
use vc_shared::phone::{is_e164, mask_phone_number, normalize_phone_number};

use crate::InfrastructureError;

/// Twilio REST API base URL
pub const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

const PROVIDER: &str = "twilio";

/// Twilio notifier configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API base URL
    pub api_base: String,
    /// Message bodies by template id
    pub templates: HashMap<String, String>,
}

impl TwilioConfig {
    /// Configuration with the default verification code template
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            DEFAULT_TEMPLATE_ID.to_string(),
            "Your verification code is {0}. It is valid for 10 minutes.".to_string(),
        );
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            request_timeout_secs: 10,
            api_base: TWILIO_API_BASE.to_string(),
            templates,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER")
            .map_err(|_| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        let mut config = Self::new(account_sid, auth_token, from_number);
        if let Some(secs) = std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.request_timeout_secs = secs;
        }
        if let Ok(body) = std::env::var("TWILIO_CODE_TEMPLATE") {
            config = config.with_template(DEFAULT_TEMPLATE_ID, body);
        }
        Ok(config)
    }

    /// Register or replace a template body
    pub fn with_template(mut self, template_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(template_id.into(), body.into());
        self
    }
}

/// Successful Messages API reply
#[derive(Debug, Deserialize)]
pub(crate) struct TwilioMessageResponse {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error reply of the Twilio API
#[derive(Debug, Deserialize)]
pub(crate) struct TwilioErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

/// Twilio notifier implementation
pub struct TwilioNotifier {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioNotifier {
    /// Create a new Twilio notifier
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        if !is_e164(&config.from_number) {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio notifier initialized with from number: {}",
            mask_phone_number(&config.from_number)
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TwilioConfig::from_env()?)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    /// Render the body of `template_id` with positional `args`
    pub fn render(&self, template_id: &str, args: &[String]) -> Result<String, NotifyError> {
        let template = self
            .config
            .templates
            .get(template_id)
            .ok_or_else(|| NotifyError::Rejected {
                provider: PROVIDER.to_string(),
                message: format!("unknown template {}", template_id),
            })?;

        Ok(args
            .iter()
            .enumerate()
            .fold(template.clone(), |body, (i, arg)| {
                body.replace(&format!("{{{}}}", i), arg)
            }))
    }

    /// Form fields of one Messages API request; numbers are sent normalized
    pub(crate) fn message_form(&self, to: &str, body: &str) -> [(&'static str, String); 3] {
        [
            ("To", normalize_phone_number(to)),
            ("From", normalize_phone_number(&self.config.from_number)),
            ("Body", body.to_string()),
        ]
    }

    async fn send_one(&self, to: &str, body: &str) -> Result<String, NotifyError> {
        let params = self.message_form(to, body);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            let message: TwilioMessageResponse = response.json().await.map_err(|e| {
                NotifyError::Unavailable {
                    provider: PROVIDER.to_string(),
                    message: format!("unreadable reply: {}", e),
                }
            })?;
            debug!(sid = %message.sid, status = ?message.status, "Twilio accepted message");
            return Ok(message.sid);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<TwilioErrorResponse>(&text) {
            Ok(reply) => match reply.code {
                Some(code) => format!("{} ({})", reply.message, code),
                None => reply.message,
            },
            Err(_) => text,
        };
        Err(classify_status(status, message))
    }
}

/// Map an HTTP error status onto the notifier error vocabulary
pub(crate) fn classify_status(status: StatusCode, message: String) -> NotifyError {
    let message = format!("HTTP {}: {}", status.as_u16(), message);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        NotifyError::Unavailable {
            provider: PROVIDER.to_string(),
            message,
        }
    } else {
        NotifyError::Rejected {
            provider: PROVIDER.to_string(),
            message,
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> NotifyError {
    if e.is_timeout() {
        NotifyError::Timeout {
            provider: PROVIDER.to_string(),
        }
    } else {
        NotifyError::Unavailable {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), NotifyError> {
        if let Some(invalid) = recipients.iter().find(|r| !is_e164(r)) {
            return Err(NotifyError::InvalidRecipient {
                recipient: mask_phone_number(invalid),
            });
        }

        let body = self.render(template_id, args)?;
        for recipient in recipients {
            match self.send_one(recipient, &body).await {
                Ok(sid) => info!(
                    provider = PROVIDER,
                    phone = %mask_phone_number(recipient),
                    sid = %sid,
                    "SMS sent"
                ),
                Err(e) => {
                    error!(
                        provider = PROVIDER,
                        phone = %mask_phone_number(recipient),
                        error = %e,
                        "Failed to send SMS"
                    );
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
