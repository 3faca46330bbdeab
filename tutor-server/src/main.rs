//! tutor-server – entry point.
//!
//! Startup order:
//! 1. Load `.env` (if present) and parse configuration from the environment.
//! 2. Initialise structured tracing (JSON or human-readable).
//! 3. Open the SQLite database and run pending migrations.
//! 4. Build the AI gateway and grade extractor.
//! 5. Build the Axum router and serve HTTP until a shutdown signal arrives.
//! 6. Close the database.

mod ai;
mod config;
mod db;
mod error;
mod extract;
mod grading;
mod middleware;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::AiGateway;
use crate::ai::openai::OpenAiClient;
use crate::config::Config;
use crate::db::sqlite::SqliteStore;
use crate::grading::PatternGradeExtractor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv = dotenvy::dotenv();
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: TUTOR_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "tutor-server starting");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = Arc::new(SqliteStore::connect(&cfg.database_url).await?);
    info!(database_url = %cfg.database_url, "database ready");

    // ── 4. AI gateway ──────────────────────────────────────────────────────────
    if cfg.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat and grading requests will fail");
    }
    let client = OpenAiClient::new(cfg.openai_api_url.clone(), cfg.openai_api_key.clone());
    let ai = AiGateway::new(Arc::new(client), cfg.openai_model.clone());
    info!(model = %ai.model(), endpoint = %cfg.openai_api_url, "AI gateway ready");

    // ── 5. HTTP server with graceful shutdown ──────────────────────────────────
    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        store: Arc::clone(&store),
        ai: Arc::new(ai),
        grades: Arc::new(PatternGradeExtractor::new()?),
    });

    let app = routes::build(state);
    let addr: SocketAddr = cfg.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // ── 6. Teardown ────────────────────────────────────────────────────────────
    store.close().await;
    info!("tutor-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = {
        use tokio::signal::unix::{SignalKind, signal};
        let installed = signal(SignalKind::terminate()).map(|mut s| async move {
            s.recv().await;
        });
        until_signal(installed, "SIGTERM")
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c    => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}

/// Resolves when the installed handler fires. A handler that could not be
/// installed never fires, so the server keeps running.
async fn until_signal<F>(installed: std::io::Result<F>, name: &str)
where
    F: Future<Output = ()>,
{
    match installed {
        Ok(signal) => signal.await,
        Err(e) => {
            warn!(error = %e, signal = name, "failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}
