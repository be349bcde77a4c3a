//! Domain layer containing the verification code entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
