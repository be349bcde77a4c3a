//! Configuration for the verification service

use vc_shared::VerificationConfig;

use crate::domain::entities::code_entry::DEFAULT_NAMESPACE;

/// Template identifier of the verification code message
pub const DEFAULT_TEMPLATE_ID: &str = "1877556";

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Namespace prefixed to every store key
    pub namespace: String,
    /// Notifier template carrying the code
    pub template_id: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            template_id: config.template_id.clone(),
        }
    }
}
