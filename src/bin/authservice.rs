//! authservice server binary.
//!
//! Reads configuration from the environment, opens the configured store, and
//! serves the credential endpoints until Ctrl+C or SIGTERM.

use anyhow::Result;
use authservice::{
    auth::RandomTokenGenerator,
    config::Config,
    http::{AppState, build_router},
    storage::{create_storage_backend, parse_storage_backend},
};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "authservice=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = authservice::config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting authservice");

    let config = Config::new()?;

    let storage_backend =
        parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    tracing::info!(backend = %config.storage_backend, "Opening storage");
    let stores = create_storage_backend(storage_backend, config.storage_options()).await?;

    let http_port = *config.http_port.as_ref();
    let app_context = AppState::new(config, stores, Arc::new(RandomTokenGenerator::new()));
    let app = build_router(app_context);

    // Setup graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    {
        let tracker = tracker.clone();
        let inner_token = token.clone();

        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!(?err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => {
                    tracing::error!(?err, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::spawn(async move {
            tokio::select! {
                () = inner_token.cancelled() => { },
                _ = terminate => {},
                _ = ctrl_c => {},
            }

            tracker.close();
            inner_token.cancel();
        });
    }

    // Start HTTP server
    {
        let bind_address = format!("0.0.0.0:{http_port}");
        tracing::info!("Starting server on {bind_address}");
        let listener = TcpListener::bind(&bind_address).await?;

        let inner_token = token.clone();
        tracker.spawn(async move {
            let shutdown_token = inner_token.clone();
            let result = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
                tracing::info!("axum graceful shutdown complete");
            })
            .await;
            if let Err(err) = result {
                tracing::error!("axum task failed: {}", err);
            }

            inner_token.cancel();
        });
    }

    tracker.wait().await;

    Ok(())
}
