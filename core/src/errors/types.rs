//! Error types for code storage and notification delivery
//!
//! Messages are bilingual (English | 中文); the presentation layer picks the
//! half matching the request language.

use thiserror::Error;

/// Verification code errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Verification code requested too frequently | 发送太频繁")]
    SendTooMany,

    #[error("Too many verification attempts | 验证太频繁")]
    VerifyTooMany,

    #[error("Verification code not found or expired | 验证码不存在或已过期")]
    NotFound,

    #[error("Verification code entry has no expiry: {key} | 验证码存在，但是没有过期时间: {key}")]
    DataCorruption { key: String },
}

/// How the failover dispatcher treats a delivery failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Counts towards rotating away from the provider
    Timeout,
    /// Permanent for this request; the provider is fine
    HardFailure,
    /// Worth retrying later; the provider is not penalised
    Transient,
}

/// Notification delivery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notifier {provider} timed out | 短信服务超时")]
    Timeout { provider: String },

    #[error("Notifier {provider} unavailable: {message} | 短信服务暂不可用")]
    Unavailable { provider: String, message: String },

    #[error("Notifier {provider} rejected the message: {message} | 短信发送被拒绝")]
    Rejected { provider: String, message: String },

    #[error("Invalid recipient: {recipient} | 无效的接收号码: {recipient}")]
    InvalidRecipient { recipient: String },

    #[error("Message rate limit exceeded | 短信发送触发限流")]
    RateLimited,

    #[error("Rate limiter failure: {message} | 限流器错误")]
    Limiter { message: String },
}

impl NotifyError {
    /// Default classification used when the caller supplies no rule
    pub fn kind(&self) -> FailureKind {
        match self {
            NotifyError::Timeout { .. } => FailureKind::Timeout,
            NotifyError::Unavailable { .. } | NotifyError::Limiter { .. } => FailureKind::Transient,
            NotifyError::Rejected { .. }
            | NotifyError::InvalidRecipient { .. }
            | NotifyError::RateLimited => FailureKind::HardFailure,
        }
    }
}
