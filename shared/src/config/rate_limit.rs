//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Sliding window limit: at most `limit` requests per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowLimit {
    /// Max requests admitted inside one window
    pub limit: u32,

    /// Window length in milliseconds
    pub window_ms: u64,
}

impl WindowLimit {
    /// Create a new window limit
    pub fn new(limit: u32, window_ms: u64) -> Self {
        Self { limit, window_ms }
    }

    /// Window length as a `Duration`
    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.window_ms)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Limit applied to inbound requests, keyed by the caller (e.g. client IP)
    #[serde(default = "default_inbound")]
    pub inbound: WindowLimit,

    /// Limit applied to outbound dispatch, keyed by template and recipient
    #[serde(default = "default_dispatch")]
    pub dispatch: WindowLimit,

    /// Key prefix for inbound limiter entries
    #[serde(default = "default_inbound_prefix")]
    pub inbound_prefix: String,

    /// Key prefix for dispatch limiter entries
    #[serde(default = "default_dispatch_prefix")]
    pub dispatch_prefix: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            inbound: default_inbound(),
            dispatch: default_dispatch(),
            inbound_prefix: default_inbound_prefix(),
            dispatch_prefix: default_dispatch_prefix(),
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            dispatch: WindowLimit::new(100, 60_000),
            ..Default::default()
        }
    }

    /// Create a production configuration (stricter limits)
    pub fn production() -> Self {
        Self::default()
    }

    /// Limiter key for an inbound caller
    pub fn inbound_key(&self, caller: &str) -> String {
        format!("{}:{}", self.inbound_prefix, caller)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_inbound() -> WindowLimit {
    // 1000 requests per second per caller
    WindowLimit::new(1000, 1_000)
}

fn default_dispatch() -> WindowLimit {
    // 5 messages per recipient per 10 minutes
    WindowLimit::new(5, 600_000)
}

fn default_inbound_prefix() -> String {
    String::from("ip-limiter")
}

fn default_dispatch_prefix() -> String {
    String::from("sms-limiter")
}
