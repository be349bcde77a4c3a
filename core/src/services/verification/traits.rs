//! Contracts consumed by the verification service

use async_trait::async_trait;

use crate::domain::entities::code_entry::{SetStatus, VerifyStatus};
use crate::errors::{DomainResult, NotifyError};

/// Atomic keyed store of one-time codes.
///
/// Both operations must be atomic per key: concurrent calls on the same key
/// observe a serialized view, and a cancelled call leaves no partial write.
/// Backend failures are reported as errors, outcomes as statuses.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store `code` under `key` unless the current entry is still in cooldown
    async fn set(&self, key: &str, code: &str) -> DomainResult<SetStatus>;

    /// Spend one attempt comparing `input_code` with the stored code
    async fn verify(&self, key: &str, input_code: &str) -> DomainResult<VerifyStatus>;
}

/// Outbound notification backend
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver template `template_id` rendered with `args` to every recipient
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), NotifyError>;

    /// Provider name used in logs and errors
    fn provider_name(&self) -> &str;
}

/// Request rate gate keyed by an arbitrary string
#[async_trait]
pub trait Limiter: Send + Sync {
    /// Returns `true` when the request identified by `key` must be refused
    async fn limit(&self, key: &str) -> DomainResult<bool>;
}

/// Source of one-time codes
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}
