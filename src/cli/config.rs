//! Shared configuration for CLI commands

use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt};

/// Common configuration shared across commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonConfig {
    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Whether to show progress bars
    pub progress: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            seed: None,
            progress: true,
            verbose: false,
        }
    }
}

impl CommonConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> &'static str {
        if self.verbose { "smartcab=debug" } else { "warn" }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(config: &CommonConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));
    // Fails only when a subscriber is already installed
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_debug() {
        let config = CommonConfig {
            verbose: true,
            ..CommonConfig::default()
        };
        assert_eq!(config.default_filter(), "smartcab=debug");
        assert_eq!(CommonConfig::default().default_filter(), "warn");
    }
}
