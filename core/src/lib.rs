//! # VCode Core
//!
//! Domain layer of the verification code workspace: the code entry state
//! machine, the contracts of code stores, limiters and notifiers, and the
//! service orchestrating issuance and verification.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
