//! # Infrastructure Layer
//!
//! Concrete implementations of the contracts defined in `vc_core`:
//!
//! - **Cache**: Redis client and the Redis / in-process code stores
//! - **Rate limiting**: sliding window limiters (Redis and in-process)
//! - **SMS**: Twilio and mock notifiers, timeout failover and rate limited decorators
//! - **Telemetry**: tracing subscriber setup
//!
//! [`initialize`] wires all of them from an [`AppConfig`].
//!
//! ## Features
//!
//! - `twilio-sms`: Enable the Twilio notifier (default)

use std::path::Path;
use std::sync::Arc;

use vc_core::services::verification::{
    CodeStore, Limiter, Notifier, VerificationService, VerificationServiceConfig,
};
use vc_core::CodePolicy;
use vc_shared::{AppConfig, CacheBackend, Environment, RateLimitConfig};

// Re-export core types for convenience
pub use vc_core::errors::*;

/// Cache module - Redis client and code stores
pub mod cache;

/// Rate limiting module - sliding window limiters
pub mod rate_limit;

/// SMS module - notifier backends and decorators
pub mod sms;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

use cache::{LocalCodeStore, RedisClient, RedisCodeStore};
use rate_limit::{LocalSlidingWindowLimiter, RedisSlidingWindowLimiter};

/// Verification service over the type-erased infrastructure components
pub type DynVerificationService = VerificationService<dyn CodeStore, dyn Notifier>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Code store selected by `cache.backend`
    pub code_store: Arc<dyn CodeStore>,
    /// Limiter for inbound requests, keyed by caller
    pub inbound_limiter: Arc<dyn Limiter>,
    /// Notifier chain used to deliver codes
    pub notifier: Arc<dyn Notifier>,
    /// Redis client, when the Redis backend is selected
    pub redis: Option<RedisClient>,
    config: VerificationServiceConfig,
    rate_limit: RateLimitConfig,
}

impl InfrastructureServices {
    /// Verification service over the configured store and notifier chain
    pub fn verification_service(&self) -> DynVerificationService {
        VerificationService::new(
            self.code_store.clone(),
            self.notifier.clone(),
            self.config.clone(),
        )
    }

    /// Whether a request from `caller` (e.g. a client IP) must be refused
    pub async fn inbound_limited(&self, caller: &str) -> Result<bool, DomainError> {
        self.inbound_limiter
            .limit(&self.rate_limit.inbound_key(caller))
            .await
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The code store (Redis or in-process)
/// - The inbound and dispatch limiters
/// - The notifier chain `[rate limit ->] failover -> providers`
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = ?config.environment,
        backend = ?config.cache.backend,
        "Initializing infrastructure services..."
    );

    let policy = CodePolicy::try_from(&config.verification)
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    let (code_store, inbound_limiter, dispatch_limiter, redis): (
        Arc<dyn CodeStore>,
        Arc<dyn Limiter>,
        Arc<dyn Limiter>,
        Option<RedisClient>,
    ) = match config.cache.backend {
        CacheBackend::Redis => {
            let client = RedisClient::new(config.cache.clone()).await?;
            if !client.health_check().await? {
                return Err(InfrastructureError::General(
                    "Redis health check failed".to_string(),
                ));
            }
            (
                Arc::new(RedisCodeStore::new(client.clone(), policy)),
                Arc::new(RedisSlidingWindowLimiter::new(
                    client.clone(),
                    config.rate_limit.inbound,
                )),
                Arc::new(RedisSlidingWindowLimiter::new(
                    client.clone(),
                    config.rate_limit.dispatch,
                )),
                Some(client),
            )
        }
        CacheBackend::Local => {
            let capacity = config.cache.local_capacity;
            (
                Arc::new(LocalCodeStore::new(policy, capacity)?),
                Arc::new(LocalSlidingWindowLimiter::new(
                    config.rate_limit.inbound,
                    capacity,
                )?),
                Arc::new(LocalSlidingWindowLimiter::new(
                    config.rate_limit.dispatch,
                    capacity,
                )?),
                None,
            )
        }
    };

    let inbound_limiter: Arc<dyn Limiter> = if config.rate_limit.enabled {
        inbound_limiter
    } else {
        Arc::new(rate_limit::Unlimited)
    };
    let dispatch_limiter = config.rate_limit.enabled.then_some(dispatch_limiter);

    let notifier = sms::create_notifier(
        &config.notifier,
        config.environment,
        dispatch_limiter,
        &config.rate_limit.dispatch_prefix,
    )?;

    tracing::info!(
        provider = notifier.provider_name(),
        "Infrastructure services initialized successfully"
    );

    Ok(InfrastructureServices {
        code_store,
        inbound_limiter,
        notifier,
        redis,
        config: VerificationServiceConfig::from(&config.verification),
        rate_limit: config.rate_limit.clone(),
    })
}

/// Load configuration from `.env`, the environment config file and `VCODE__*` variables
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    load_env_files(Path::new("."));
    AppConfig::load().map_err(|e| InfrastructureError::Config(e.to_string()))
}

/// Load `dir/.env`, then the file of the environment it selects (e.g. `.env.production`)
///
/// Variables already set are never overridden, so the process environment
/// wins over `.env`, which wins over the per-environment file.
pub fn load_env_files(dir: &Path) -> Environment {
    dotenvy::from_path(dir.join(".env")).ok();
    let environment = Environment::from_env();
    dotenvy::from_path(dir.join(environment.env_file())).ok();
    environment
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Storage {
            message: err.to_string(),
        }
    }
}
