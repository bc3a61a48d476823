//! Tracing subscriber setup for the server binary.

use crate::utils::toml_config::{LogFormat, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level for
/// this crate and the HTTP trace layer. `verbose` forces `debug`.
pub fn env_filter(server: &ServerConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { server.log_level.as_str() };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "portal={level},portal_server={level},tower_http={level}"
        ))
    })
}

/// Installs the global subscriber. Call once, before serving.
pub fn init(server: &ServerConfig, verbose: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(server, verbose));

    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_level() {
        std::env::remove_var("RUST_LOG");
        let server = ServerConfig {
            log_level: "warn".to_string(),
            ..ServerConfig::default()
        };

        let filter = env_filter(&server, false).to_string();
        assert!(filter.contains("portal=warn"), "{filter}");

        let filter = env_filter(&server, true).to_string();
        assert!(filter.contains("portal=debug"), "{filter}");
    }
}
