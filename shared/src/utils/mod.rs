//! Utility helpers

pub mod phone;
