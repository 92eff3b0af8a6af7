pub(crate) mod cli;
mod commands;
mod http;
mod protocol;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use seedgate_common::persist::FileSeedStore;

use cli::{Cli, Command, Config};
use state::{AppState, KeyCache};

/// Maximum time to wait for orderly shutdown before forcing exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(20);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = match cli.verbose {
        0 => cli.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Hold the non-blocking guards for the lifetime of main so logs flush on exit.
    let log_guards = init_logging(env_filter, cli.log_file.as_deref())?;

    let config = Config::from_cli(&cli);

    // ── Synchronous subcommands (no runtime needed) ──────────────────
    match &cli.command {
        Some(Command::Version) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "platform": std::env::consts::OS,
                    })
                );
            } else {
                println!("seedgate {}", env!("CARGO_PKG_VERSION"));
            }
            return Ok(());
        }
        Some(Command::DecryptSeed { input }) => {
            return commands::seed::decrypt(&config, input.as_deref(), cli.json);
        }
        Some(Command::Code) => return commands::seed::code(&config, cli.json),
        Some(Command::Verify { code, window }) => {
            return commands::seed::verify(&config, code, *window, cli.json);
        }
        Some(Command::LogCode) => {
            let status = commands::seed::log_code(&config.seed_path);
            drop(log_guards);
            std::process::exit(status);
        }
        Some(Command::Proof { commit }) => {
            return commands::proof::proof(&config, commit.as_deref());
        }
        Some(Command::VerifyProof {
            file,
            recipient_private_key,
            signer_key,
        }) => {
            return commands::proof::verify_proof(file, recipient_private_key, signer_key, cli.json);
        }
        Some(Command::Serve) | None => {}
    }

    // ── Everything below needs a Tokio runtime ──────────────────────
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    startup_diagnostics(&config);

    let keys = KeyCache::new(&config.private_key_path);
    keys.warm().await;
    let store = Arc::new(FileSeedStore::new(&config.seed_path));
    let state = Arc::new(AppState::new(keys, store));

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = start_http(state, &config, token).await {
            tracing::error!(error = %e, "HTTP adapter failed");
        }
    });

    tracing::info!("Ready.");

    shutdown_signal().await;
    tracing::info!("Shutting down...");

    cancel.cancel();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await.is_err() {
        tracing::warn!("Shutdown timed out after {:?}, forcing exit", SHUTDOWN_TIMEOUT);
    }

    Ok(())
}

// ── HTTP server startup ─────────────────────────────────────────────

async fn start_http(
    state: Arc<AppState>,
    config: &Config,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    use tower_http::cors::CorsLayer;

    let app = http::routes(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind((config.bind, config.http_port)).await?;
    tracing::info!("HTTP adapter listening on {}:{}", config.bind, config.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("HTTP adapter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ── Startup diagnostics ─────────────────────────────────────────────

fn startup_diagnostics(config: &Config) {
    tracing::info!("seedgate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Platform: {}", std::env::consts::OS);

    match hostname::get() {
        Ok(h) => tracing::info!("Hostname: {}", h.to_string_lossy()),
        Err(e) => tracing::warn!(error = %e, "Could not determine hostname"),
    }

    tracing::info!("Seed file: {}", config.seed_path.display());
    tracing::info!("Private key: {}", config.private_key_path.display());
}

pub(crate) fn init_logging(
    env_filter: tracing_subscriber::EnvFilter,
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Vec<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    // Non-blocking stderr keeps a full pipe from stalling request handling.
    let (nb_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(nb_stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let (nb_file, file_guard) = tracing_appender::non_blocking(file);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(nb_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        Ok(vec![stderr_guard, file_guard])
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();

        Ok(vec![stderr_guard])
    }
}
