//! Init command implementation
//!
//! Scaffolds `portal.toml`, `.env.example` and a `.gitignore` so the server
//! can be started right away.

use super::output::Output;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (portal.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
    /// Collections to serve
    pub collections: Vec<String>,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Portal");

    let base_path = &config.path;
    let config_path = base_path.join("portal.toml");
    if config_path.exists() && !config.force {
        output.warning("portal.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if let Err(e) = fs::create_dir_all(&data_dir) {
        output.error(&format!("Failed to create data/: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("directory", "data");

    if let Err(e) = write_file(&config_path, &generate_portal_toml(&config), config.force) {
        output.error(&format!("Failed to create portal.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "portal.toml");

    let env_example_path = base_path.join(".env.example");
    match write_file(&env_example_path, &generate_env_example(), config.force) {
        Ok(()) => output.created("env", ".env.example"),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            output.skipped(".env.example", "already exists")
        }
        Err(e) => {
            output.error(&format!("Failed to create .env.example: {}", e));
            return InitResult::Error(e.to_string());
        }
    }

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.success("Portal initialized");
    output.header("Next Steps");
    output.info("1. Set the token signing secret:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set SECRET to a long random value");
    output.info("2. Start the server:");
    output.command("portal-server");

    InitResult::Success
}

/// Writes `content` to `path`. Without `force` an existing file is an
/// `AlreadyExists` error.
fn write_file(path: &Path, content: &str, force: bool) -> io::Result<()> {
    if path.exists() && !force {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }
    fs::write(path, content)
}

fn generate_portal_toml(config: &InitConfig) -> String {
    let collections = config
        .collections
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# Portal configuration

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"

[auth]
# Name of the environment variable holding the token signing secret.
# The server refuses to start when it is unset or empty.
jwt_secret_env = "SECRET"
# Token lifetime in seconds (24 hours)
token_ttl_secs = 86400

[database]
# SQLite file path, or ":memory:" for an ephemeral database
url = "./data/portal.db"

[collections]
names = [{collections}]
"#,
        host = config.host,
        port = config.port,
        collections = collections,
    )
}

fn generate_env_example() -> String {
    r#"# Token signing secret (required). The server refuses to start while it
# is empty. Use a long random value, e.g.
#   openssl rand -hex 32
SECRET=

# Optional log filter override
# RUST_LOG=portal=debug,tower_http=debug
"#
    .to_string()
}

fn generate_gitignore() -> &'static str {
    "/target\n.env\ndata/\n*.db\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::PortalConfig;

    fn init_config(path: &Path, force: bool) -> InitConfig {
        InitConfig {
            path: path.to_path_buf(),
            force,
            host: "0.0.0.0".to_string(),
            port: 4000,
            collections: vec!["food".to_string(), "clothes".to_string()],
        }
    }

    #[test]
    fn test_init_creates_files() {
        let dir = tempfile::tempdir().expect("temp dir");

        let result = run(init_config(dir.path(), false), &Output::no_color());

        assert_eq!(result, InitResult::Success);
        assert!(dir.path().join("portal.toml").exists());
        assert!(dir.path().join(".env.example").exists());
        assert!(dir.path().join(".gitignore").exists());
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("portal.toml"), "# mine").expect("write");

        let result = run(init_config(dir.path(), false), &Output::no_color());
        assert_eq!(result, InitResult::AlreadyExists);
        assert_eq!(
            fs::read_to_string(dir.path().join("portal.toml")).expect("read"),
            "# mine"
        );

        let result = run(init_config(dir.path(), true), &Output::no_color());
        assert_eq!(result, InitResult::Success);
    }

    #[test]
    fn test_env_example_leaves_secret_blank() {
        let env = generate_env_example();
        let secret_line = env
            .lines()
            .find(|line| line.starts_with("SECRET="))
            .expect("SECRET line present");

        assert_eq!(secret_line, "SECRET=");
    }

    #[test]
    fn test_generated_config_is_loadable() {
        std::env::set_var("SECRET", "init-test-secret-value-0123456789");
        let toml = generate_portal_toml(&init_config(Path::new("."), false));

        let config = PortalConfig::parse(&toml).expect("generated config should load");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.collections.names, vec!["food", "clothes"]);
    }
}
