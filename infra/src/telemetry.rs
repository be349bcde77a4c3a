//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};
use vc_shared::{LogFormat, LoggingConfig};

/// Install the global fmt subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured level. Returns `false` when a global
/// subscriber was already installed (e.g. by a test harness).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            colored: false,
            source_location: false,
        };
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
