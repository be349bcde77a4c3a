//! Shared configuration and utilities for the verification code workspace
//!
//! This crate provides functionality used by every other crate:
//! - Configuration types and layered loading
//! - Recipient helpers (phone validation, log masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, Environment, LogFormat, LoggingConfig,
    NotifierConfig, RateLimitConfig, VerificationConfig, WindowLimit,
};
pub use utils::phone;
