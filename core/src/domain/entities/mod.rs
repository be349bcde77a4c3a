//! Domain entities representing core business objects.

pub mod code_entry;


// Re-export commonly used types
pub use code_entry::{
    code_key, codes_match, CodeEntry, CodePolicy, SetStatus, VerifyStatus, CODE_LENGTH,
    DEFAULT_COOLDOWN_SECONDS, DEFAULT_MAX_ATTEMPTS, DEFAULT_NAMESPACE, DEFAULT_VALIDITY_SECONDS,
};
