//! Configuration and process utilities.

/// Tracing subscriber setup.
pub mod logging;
/// `portal.toml` loading and validation.
pub mod toml_config;
