//! Redis-backed code store
//!
//! Each code lives in one hash `{code, attempts}` whose key expires after the
//! code validity (millisecond precision). `set` and `verify` each run as a
//! single Lua script, so concurrent callers on one key are serialized by the
//! server.

use async_trait::async_trait;
use redis::Script;
use vc_core::domain::entities::code_entry::{CodePolicy, SetStatus, VerifyStatus};
use vc_core::errors::{CodeError, DomainResult};
use vc_core::services::verification::CodeStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

const SET_CODE_SCRIPT: &str = include_str!("lua/set_code.lua");
const VERIFY_CODE_SCRIPT: &str = include_str!("lua/verify_code.lua");

/// Code store backed by a shared Redis instance
pub struct RedisCodeStore {
    client: RedisClient,
    policy: CodePolicy,
    set_script: Script,
    verify_script: Script,
}

impl RedisCodeStore {
    /// Create a store applying `policy` to every new code
    pub fn new(client: RedisClient, policy: CodePolicy) -> Self {
        Self {
            client,
            policy,
            set_script: Script::new(SET_CODE_SCRIPT),
            verify_script: Script::new(VERIFY_CODE_SCRIPT),
        }
    }

    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }
}

/// Arguments of `set_code.lua`; durations travel in milliseconds
pub(crate) fn set_script_args(code: &str, policy: &CodePolicy) -> [String; 4] {
    [
        code.to_string(),
        policy.validity.as_millis().to_string(),
        policy.cooldown.as_millis().to_string(),
        policy.max_attempts.to_string(),
    ]
}

/// Map a `set_code.lua` reply
pub(crate) fn set_status_from_reply(reply: i64) -> Result<SetStatus, InfrastructureError> {
    match reply {
        0 => Ok(SetStatus::Ok),
        -1 => Ok(SetStatus::TooSoon),
        -2 => Ok(SetStatus::Corrupted),
        other => Err(InfrastructureError::General(format!(
            "unexpected set script reply: {}",
            other
        ))),
    }
}

/// Map a `verify_code.lua` reply; `None` marks a malformed entry
pub(crate) fn verify_status_from_reply(
    reply: i64,
) -> Result<Option<VerifyStatus>, InfrastructureError> {
    match reply {
        0 => Ok(Some(VerifyStatus::Match)),
        -1 => Ok(Some(VerifyStatus::TooManyAttempts)),
        -2 => Ok(Some(VerifyStatus::NoMatch)),
        -3 => Ok(Some(VerifyStatus::NotFound)),
        -4 => Ok(None),
        other => Err(InfrastructureError::General(format!(
            "unexpected verify script reply: {}",
            other
        ))),
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(&self, key: &str, code: &str) -> DomainResult<SetStatus> {
        let args = set_script_args(code, &self.policy);
        let reply: i64 = self.client.run_script(&self.set_script, &[key], &args).await?;
        let status = set_status_from_reply(reply)?;

        if status == SetStatus::Corrupted {
            tracing::error!(event = "code_entry_corrupted", "Code entry exists without expiry");
        }
        Ok(status)
    }

    async fn verify(&self, key: &str, input_code: &str) -> DomainResult<VerifyStatus> {
        let reply: i64 = self
            .client
            .run_script(&self.verify_script, &[key], &[input_code.to_string()])
            .await?;

        match verify_status_from_reply(reply)? {
            Some(status) => Ok(status),
            None => {
                tracing::error!(event = "code_entry_corrupted", "Code entry is missing fields");
                Err(CodeError::DataCorruption {
                    key: key.to_string(),
                }
                .into())
            }
        }
    }
}
