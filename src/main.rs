use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use portal::{
    api::routes::create_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    db::DatabaseProvider,
    utils::logging,
    AppState, PortalConfig,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
            collections,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    host,
                    port,
                    collections,
                },
                &output,
            );
            match result {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        None => serve(cli.config, cli.verbose).await,
    }
}

fn show_config(path: &std::path::Path, validate_only: bool, output: &Output) -> Result<()> {
    let config = match PortalConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            return Err(e).with_context(|| format!("invalid config {}", path.display()));
        }
    };

    if validate_only {
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("listen", &config.bind_address());
    output.kv("log level", &config.server.log_level);
    output.kv("database", &config.database.url);
    output.kv("secret env", &config.auth.jwt_secret_env);
    output.kv("token ttl (s)", &config.auth.token_ttl_secs.to_string());

    output.header("Collections");
    for name in &config.collections.names {
        output.list_item(name);
    }
    Ok(())
}

async fn serve(config_path: std::path::PathBuf, verbose: bool) -> Result<()> {
    let config = PortalConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    logging::init(&config.server, verbose);

    let db = DatabaseProvider::from_url(&config.database.url)
        .create_client()
        .await
        .context("failed to open database")?;

    let addr = config.bind_address();
    let state = AppState::new(config, db)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, "portal listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
