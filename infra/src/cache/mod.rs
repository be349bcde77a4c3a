//! Cache module - code stores
//!
//! This module provides the Redis client and the two `CodeStore`
//! implementations: Redis-backed (server-side scripts) and in-process
//! (LRU under a single lock).

pub mod local_code_store;
pub mod redis_client;
pub mod redis_code_store;

#[cfg(test)]
mod tests;

pub use local_code_store::LocalCodeStore;
pub use redis_client::RedisClient;
pub use redis_code_store::RedisCodeStore;

// Re-export commonly used types
pub use vc_shared::config::cache::CacheConfig;
