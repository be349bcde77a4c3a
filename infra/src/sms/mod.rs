//! SMS Notifier Module
//!
//! This module provides the notifier backends used to deliver verification
//! codes and the decorators composing them into a delivery chain.
//!
//! ## Features
//!
//! - **Mock Implementation**: Logs and records deliveries for development
//! - **Twilio Support**: Production SMS via the Twilio REST API
//! - **Timeout Failover**: Rotates to the next provider after repeated timeouts
//! - **Rate Limiting**: Per template and recipient dispatch limits
//! - **Security**: Phone number masking in logs

use std::sync::Arc;

use vc_core::services::verification::{Limiter, Notifier};
use vc_shared::{Environment, NotifierConfig};

use crate::InfrastructureError;

pub mod failover;
pub mod mock_sms;
pub mod rate_limited;

// Twilio notifier (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use failover::{FailureClassifier, TimeoutFailoverNotifier};
pub use mock_sms::{MockNotifier, SentMessage};
pub use rate_limited::RateLimitedNotifier;

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioNotifier};

/// Build a single provider by name
pub fn create_provider(name: &str) -> Result<Arc<dyn Notifier>, InfrastructureError> {
    match name {
        "mock" => Ok(Arc::new(MockNotifier::new())),
        #[cfg(feature = "twilio-sms")]
        "twilio" => Ok(Arc::new(TwilioNotifier::from_env()?)),
        other => Err(InfrastructureError::Config(format!(
            "unknown notifier provider '{}'",
            other
        ))),
    }
}

/// Create the notifier chain described by `config`
///
/// The chain is `[RateLimitedNotifier ->] TimeoutFailoverNotifier -> providers`,
/// the rate limiting layer being present only when `dispatch_limiter` is given.
/// Every configured provider must initialize. The mock provider is refused
/// outside development since it reports deliveries it never makes.
pub fn create_notifier(
    config: &NotifierConfig,
    environment: Environment,
    dispatch_limiter: Option<Arc<dyn Limiter>>,
    limiter_prefix: &str,
) -> Result<Arc<dyn Notifier>, InfrastructureError> {
    let mut providers: Vec<Arc<dyn Notifier>> = Vec::with_capacity(config.providers.len());
    for name in &config.providers {
        if name == "mock" && !environment.is_development() {
            return Err(InfrastructureError::Config(format!(
                "mock notifier is not allowed in {}",
                environment
            )));
        }
        let provider = create_provider(name).map_err(|e| {
            tracing::error!("Failed to initialize notifier provider '{}': {}", name, e);
            e
        })?;
        providers.push(provider);
    }

    let failover = TimeoutFailoverNotifier::new(providers, config.failover_threshold)?
        .with_call_timeout(config.call_timeout());
    let failover: Arc<dyn Notifier> = Arc::new(failover);

    Ok(match dispatch_limiter {
        Some(limiter) => Arc::new(RateLimitedNotifier::new(failover, limiter, limiter_prefix)),
        None => failover,
    })
}
