//! Verification code policy configuration

use serde::{Deserialize, Serialize};

/// Lifetime, cooldown and attempt limits of one-time codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Store key namespace; keys look like `<namespace>:<biz>:<target>`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Seconds a code stays valid
    #[serde(default = "default_validity_seconds")]
    pub validity_seconds: u64,

    /// Minimum seconds between two codes for the same key
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Verification attempts granted per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Notifier template used for code messages
    #[serde(default = "default_template_id")]
    pub template_id: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            validity_seconds: default_validity_seconds(),
            cooldown_seconds: default_cooldown_seconds(),
            max_attempts: default_max_attempts(),
            template_id: default_template_id(),
        }
    }
}

fn default_namespace() -> String {
    String::from("phone_code")
}

fn default_validity_seconds() -> u64 {
    600 // 10 minutes
}

fn default_cooldown_seconds() -> u64 {
    60 // 1 minute
}

fn default_max_attempts() -> u32 {
    3
}

fn default_template_id() -> String {
    String::from("1877556")
}
