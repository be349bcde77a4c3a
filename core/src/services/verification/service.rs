//! Main verification service implementation

use std::sync::Arc;

use rand::{rngs::OsRng, Rng};
use vc_shared::utils::phone::mask_phone_number;

use crate::domain::entities::code_entry::code_key;
use crate::errors::{CodeError, DomainError, DomainResult};

use super::config::VerificationServiceConfig;
use super::traits::{CodeGenerator, CodeStore, Notifier};

/// Six-digit codes drawn from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = OsRng;
        format!("{:06}", rng.gen_range(0..1_000_000u32))
    }
}

/// Verification service issuing and checking one-time codes
pub struct VerificationService<C: CodeStore + ?Sized, N: Notifier + ?Sized> {
    /// Atomic code store
    code_store: Arc<C>,
    /// Notifier delivering the code
    notifier: Arc<N>,
    /// Code source
    generator: Arc<dyn CodeGenerator>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<C: CodeStore + ?Sized, N: Notifier + ?Sized> VerificationService<C, N> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `code_store` - Store holding the live codes
    /// * `notifier` - Notifier used to deliver codes
    /// * `config` - Service configuration
    pub fn new(code_store: Arc<C>, notifier: Arc<N>, config: VerificationServiceConfig) -> Self {
        Self {
            code_store,
            notifier,
            generator: Arc::new(RandomCodeGenerator),
            config,
        }
    }

    /// Replace the code generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a fresh code for `(biz, target)` and deliver it.
    ///
    /// The code is stored before dispatch. If dispatch fails the stored code
    /// stays live, so a retry inside the cooldown is refused with
    /// `SendTooMany` until the cooldown elapses.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code stored and delivered
    /// * `Err(DomainError::Code(SendTooMany))` - Previous code still in cooldown
    /// * `Err(DomainError::Code(DataCorruption))` - Stored entry has no expiry
    /// * `Err(DomainError::Notify(_))` - Code stored but delivery failed
    pub async fn send_code(&self, biz: &str, target: &str) -> DomainResult<()> {
        let key = self.key(biz, target)?;
        let masked = mask_phone_number(target);
        let code = self.generator.generate();

        let status = self.code_store.set(&key, &code).await?;
        if let Err(e) = status.into_result(&key) {
            tracing::warn!(
                biz = biz,
                target = %masked,
                status = status.as_str(),
                event = "code_set_refused",
                "Verification code was not stored"
            );
            return Err(e);
        }

        let args = [code];
        let recipients = [target.to_string()];
        match self
            .notifier
            .send(&self.config.template_id, &args, &recipients)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    biz = biz,
                    target = %masked,
                    provider = self.notifier.provider_name(),
                    event = "code_sent",
                    "Verification code sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    biz = biz,
                    target = %masked,
                    provider = self.notifier.provider_name(),
                    error = %e,
                    event = "code_dispatch_failed",
                    "Verification code stored but not delivered"
                );
                Err(DomainError::Notify(e))
            }
        }
    }

    /// Check `input_code` against the live code for `(biz, target)`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Code matched and was consumed
    /// * `Ok(false)` - Wrong code, or attempts exhausted
    /// * `Err(DomainError::Code(NotFound))` - No live code
    /// * `Err(_)` - Store failure
    pub async fn verify_code(&self, biz: &str, target: &str, input_code: &str) -> DomainResult<bool> {
        let key = self.key(biz, target)?;
        let status = self.code_store.verify(&key, input_code).await?;

        tracing::debug!(
            biz = biz,
            target = %mask_phone_number(target),
            status = status.as_str(),
            event = "code_verified",
            "Verification attempt processed"
        );

        match status.into_result() {
            // Exhaustion is reported like a wrong code to avoid an oracle
            Err(DomainError::Code(CodeError::VerifyTooMany)) => Ok(false),
            other => other,
        }
    }

    fn key(&self, biz: &str, target: &str) -> DomainResult<String> {
        if biz.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Business tag cannot be empty".to_string(),
            });
        }
        if target.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Target cannot be empty".to_string(),
            });
        }
        Ok(code_key(&self.config.namespace, biz, target))
    }
}
