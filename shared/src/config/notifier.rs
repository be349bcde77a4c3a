//! Notifier chain configuration

use serde::{Deserialize, Serialize};

/// Ordered notifier providers and failover behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Providers in failover order ("twilio", "mock")
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,

    /// Consecutive timeouts before rotating to the next provider
    #[serde(default = "default_failover_threshold")]
    pub failover_threshold: u32,

    /// Deadline for a single provider call in milliseconds; 0 disables it
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            failover_threshold: default_failover_threshold(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

impl NotifierConfig {
    /// Configuration failing over across the given providers
    pub fn failover<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Per-call deadline, if enabled
    pub fn call_timeout(&self) -> Option<std::time::Duration> {
        match self.call_timeout_ms {
            0 => None,
            ms => Some(std::time::Duration::from_millis(ms)),
        }
    }
}

fn default_providers() -> Vec<String> {
    vec![String::from("mock")]
}

fn default_failover_threshold() -> u32 {
    3
}

fn default_call_timeout_ms() -> u64 {
    5_000
}
