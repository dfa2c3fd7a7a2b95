//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install the global JSON subscriber
///
/// `service.log_level` is read as an `EnvFilter` directive; an invalid one
/// falls back to `info`. Calling this twice leaves the first subscriber in
/// place.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|e| {
        eprintln!(
            "invalid log level '{}' ({e}), using info",
            config.service.log_level
        );
        EnvFilter::new("info")
    });

    let installed = tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            service = %config.service.name,
            environment = %config.service.environment,
            "Tracing initialized"
        );
    }

    Ok(())
}

/// Flush logs before exit
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        let mut config = Config::default();
        config.service.log_level = "not==valid".to_string();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&Config::default()).is_ok());
    }
}
