//! Configuration module with sub-modules per concern
//!
//! - `cache` - code store backend and Redis connection
//! - `environment` - environment detection and logging configuration
//! - `notifier` - notifier providers and failover behaviour
//! - `rate_limit` - sliding window limits for inbound and outbound traffic
//! - `verification` - code lifetime, cooldown and attempt policy

pub mod cache;
pub mod environment;
pub mod notifier;
pub mod rate_limit;
pub mod verification;

use serde::{Deserialize, Serialize};

pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notifier::NotifierConfig;
pub use rate_limit::{RateLimitConfig, WindowLimit};
pub use verification::VerificationConfig;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "VCODE";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Code store and Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Verification code policy
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Notifier chain configuration
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    ///
    /// Runs fully in-process: local code store, mock notifier, lenient limits.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cache: CacheConfig::local(),
            verification: VerificationConfig::default(),
            rate_limit: RateLimitConfig::development(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    ///
    /// Codes are delivered through Twilio only.
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            cache: CacheConfig::default(),
            verification: VerificationConfig::default(),
            rate_limit: RateLimitConfig::production(),
            notifier: NotifierConfig::failover(["twilio"]),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Preset for the environment named by `ENVIRONMENT`
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.rate_limit = RateLimitConfig::development();
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration in layers.
    ///
    /// Starts from the preset of the current environment, then applies the
    /// optional `config.<env>.toml` file and finally `VCODE__*` variables
    /// (e.g. `VCODE__VERIFICATION__COOLDOWN_SECONDS=30`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let preset = Self::from_env();
        let file = preset.environment.config_file().to_string();
        Self::load_layered(preset, Some(&file))
    }

    /// Layer an optional file and the environment over `base`
    pub fn load_layered(base: Self, file: Option<&str>) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&base)?;
        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_preset_runs_in_process() {
        let config = AppConfig::development();
        assert_eq!(config.cache.backend, CacheBackend::Local);
        assert_eq!(config.notifier.providers, vec!["mock".to_string()]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_production_preset_delivers_through_twilio_only() {
        let config = AppConfig::production();
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.notifier.providers, vec!["twilio".to_string()]);
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn test_load_layered_keeps_base_without_overrides() {
        let base = AppConfig::development();
        let loaded = AppConfig::load_layered(base.clone(), None).unwrap();
        assert_eq!(loaded.verification.namespace, base.verification.namespace);
        assert_eq!(loaded.verification.cooldown_seconds, base.verification.cooldown_seconds);
        assert_eq!(loaded.cache.backend, base.cache.backend);
    }
}
