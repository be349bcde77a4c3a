//! One-time code entry and the policy governing its lifecycle.
//!
//! An entry moves through `Active(n) -> ... -> Exhausted(0)` as wrong codes
//! are submitted, and is consumed by the first correct submission. The same
//! transitions are implemented server-side by the Redis store scripts; the
//! in-process store drives them through [`CodeEntry`] directly.

use std::time::Duration;

use constant_time_eq::constant_time_eq;
use tokio::time::Instant;
use vc_shared::VerificationConfig;

use crate::errors::{CodeError, DomainError, DomainResult};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Verification attempts granted to a fresh code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default code lifetime (10 minutes)
pub const DEFAULT_VALIDITY_SECONDS: u64 = 600;

/// Default minimum interval between two codes for the same key
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 60;

/// Default store key namespace
pub const DEFAULT_NAMESPACE: &str = "phone_code";

/// Build the store key `<namespace>:<biz>:<target>`.
///
/// The key is the unit of atomicity for every store operation.
pub fn code_key(namespace: &str, biz: &str, target: &str) -> String {
    format!("{}:{}:{}", namespace, biz, target)
}

/// Compare a stored code with user input without leaking timing
pub fn codes_match(stored: &str, input: &str) -> bool {
    stored.len() == input.len() && constant_time_eq(stored.as_bytes(), input.as_bytes())
}

/// Lifetime, cooldown and attempt policy shared by all store implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePolicy {
    /// How long a code stays valid
    pub validity: Duration,
    /// Minimum interval between two successful `set` calls on one key
    pub cooldown: Duration,
    /// Attempts granted to a fresh code
    pub max_attempts: u32,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            validity: Duration::from_secs(DEFAULT_VALIDITY_SECONDS),
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CodePolicy {
    /// Create a validated policy
    pub fn new(validity: Duration, cooldown: Duration, max_attempts: u32) -> DomainResult<Self> {
        let policy = Self {
            validity,
            cooldown,
            max_attempts,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy invariants
    pub fn validate(&self) -> DomainResult<()> {
        if self.validity.is_zero() {
            return Err(DomainError::Validation {
                message: "code validity must be positive".to_string(),
            });
        }
        if self.cooldown > self.validity {
            return Err(DomainError::Validation {
                message: format!(
                    "cooldown ({}s) cannot exceed validity ({}s)",
                    self.cooldown.as_secs(),
                    self.validity.as_secs()
                ),
            });
        }
        if self.max_attempts == 0 {
            return Err(DomainError::Validation {
                message: "at least one verification attempt is required".to_string(),
            });
        }
        Ok(())
    }

    /// Remaining TTL above which an existing entry is still in cooldown
    pub fn resend_threshold(&self) -> Duration {
        self.validity.saturating_sub(self.cooldown)
    }
}

impl TryFrom<&VerificationConfig> for CodePolicy {
    type Error = DomainError;

    fn try_from(config: &VerificationConfig) -> Result<Self, Self::Error> {
        Self::new(
            Duration::from_secs(config.validity_seconds),
            Duration::from_secs(config.cooldown_seconds),
            config.max_attempts,
        )
    }
}

/// Outcome of a store `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetStatus {
    /// A fresh entry was written
    Ok,
    /// The existing entry is still inside its cooldown
    TooSoon,
    /// An entry exists but its expiry cannot be determined
    Corrupted,
}

impl SetStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            SetStatus::Ok => "OK",
            SetStatus::TooSoon => "TOO_SOON",
            SetStatus::Corrupted => "CORRUPTED",
        }
    }

    /// Map the status onto the domain error vocabulary
    pub fn into_result(self, key: &str) -> DomainResult<()> {
        match self {
            SetStatus::Ok => Ok(()),
            SetStatus::TooSoon => Err(CodeError::SendTooMany.into()),
            SetStatus::Corrupted => Err(CodeError::DataCorruption {
                key: key.to_string(),
            }
            .into()),
        }
    }
}

/// Outcome of a store `verify`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    /// No live entry for the key
    NotFound,
    /// Attempts are exhausted; nothing was mutated
    TooManyAttempts,
    /// Input matched; the entry is consumed
    Match,
    /// Input did not match; one attempt was spent
    NoMatch,
}

impl VerifyStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStatus::NotFound => "NOT_FOUND",
            VerifyStatus::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            VerifyStatus::Match => "MATCH",
            VerifyStatus::NoMatch => "NO_MATCH",
        }
    }

    /// Map the status onto the domain error vocabulary
    pub fn into_result(self) -> DomainResult<bool> {
        match self {
            VerifyStatus::Match => Ok(true),
            VerifyStatus::NoMatch => Ok(false),
            VerifyStatus::TooManyAttempts => Err(CodeError::VerifyTooMany.into()),
            VerifyStatus::NotFound => Err(CodeError::NotFound.into()),
        }
    }
}

/// A live one-time code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    code: String,
    remaining_attempts: u32,
    expires_at: Instant,
}

impl CodeEntry {
    /// Fresh entry with the full attempt budget, expiring `policy.validity` after `now`
    pub fn new(code: impl Into<String>, policy: &CodePolicy, now: Instant) -> Self {
        Self {
            code: code.into(),
            remaining_attempts: policy.max_attempts,
            expires_at: now + policy.validity,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.remaining_attempts
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Time left before the entry expires
    pub fn remaining_ttl(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Whether a replacement code must still be refused
    pub fn in_cooldown(&self, policy: &CodePolicy, now: Instant) -> bool {
        self.remaining_ttl(now) > policy.resend_threshold()
    }

    /// Spend one attempt on `input`.
    ///
    /// The attempt is decremented before the comparison so that a match and
    /// a mismatch cost the same; an exhausted entry is left untouched.
    pub fn attempt(&mut self, input: &str) -> VerifyStatus {
        if self.remaining_attempts == 0 {
            return VerifyStatus::TooManyAttempts;
        }
        self.remaining_attempts -= 1;
        if codes_match(&self.code, input) {
            VerifyStatus::Match
        } else {
            VerifyStatus::NoMatch
        }
    }
}
