//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    CodeGenerator, CodeStore, Limiter, Notifier, RandomCodeGenerator, VerificationService,
    VerificationServiceConfig, DEFAULT_TEMPLATE_ID,
};
