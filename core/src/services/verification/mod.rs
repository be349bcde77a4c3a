//! Verification code module
//!
//! This module provides the one-time code workflow:
//! - Code generation and atomic storage with cooldown
//! - Attempt-limited verification
//! - Dispatch through a pluggable (failover, rate limited) notifier

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::{VerificationServiceConfig, DEFAULT_TEMPLATE_ID};
pub use service::{RandomCodeGenerator, VerificationService};
pub use traits::{CodeGenerator, CodeStore, Limiter, Notifier};
