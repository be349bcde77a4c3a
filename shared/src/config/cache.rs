//! Code store configuration module

use serde::{Deserialize, Serialize};

/// Which code store and limiter implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis instance; required when more than one process serves traffic
    Redis,
    /// In-process LRU store for single-process deployments
    Local,
}

impl Default for CacheBackend {
    fn default() -> Self {
        CacheBackend::Redis
    }
}

/// Redis and local store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Store backend
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Maximum number of entries kept by the local store and local limiter
    #[serde(default = "default_local_capacity")]
    pub local_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: default_url(),
            connection_timeout: default_connection_timeout(),
            connect_retries: default_connect_retries(),
            local_capacity: default_local_capacity(),
        }
    }
}

impl CacheConfig {
    /// Redis-backed configuration for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// In-process configuration
    pub fn local() -> Self {
        Self {
            backend: CacheBackend::Local,
            ..Default::default()
        }
    }

    /// Set the local store capacity
    pub fn with_local_capacity(mut self, capacity: usize) -> Self {
        self.local_capacity = capacity;
        self
    }
}

fn default_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_connect_retries() -> u32 {
    3
}

fn default_local_capacity() -> usize {
    10_000
}
