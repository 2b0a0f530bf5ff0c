mod app;
mod handlers;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use jjmgmt_auth::{AuthConfig, AuthState};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::create_app;

/// jj-mgmt API - social sign-in and app sessions for the mobile client
#[derive(Parser, Debug)]
#[command(name = "jj-mgmt-api")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "4000", env = "PORT")]
    port: u16,

    /// Origin allowed to call the API from a browser
    #[arg(long, default_value = "http://localhost:8081", env = "CORS_ORIGIN")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Local .env first so clap and the auth config both see it
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jjmgmt_api=debug,jjmgmt_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AuthConfig::from_env();
    log_config_warnings(&config);

    let auth_state = AuthState::new(&config)?;

    let cors_origin = HeaderValue::from_str(&cli.cors_origin)
        .with_context(|| format!("invalid CORS origin: {}", cli.cors_origin))?;

    let app = create_app(auth_state, cors_origin);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("jj-mgmt-api listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Missing settings are not fatal at startup; the affected endpoint answers 500.
fn log_config_warnings(config: &AuthConfig) {
    if config.google.client_ids.is_empty() {
        tracing::warn!("GOOGLE_CLIENT_ID not set, Google idToken sign-in is disabled");
    }
    if config.apple.audiences().is_empty() {
        tracing::warn!("APPLE_SERVICE_ID and APPLE_BUNDLE_ID not set, Apple sign-in is disabled");
    }
    if config.session.secret.is_none() {
        tracing::warn!("APP_JWT_SECRET not set, sessions cannot be issued or verified");
    }
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
