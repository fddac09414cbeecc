//! HTTP API over `QueryService`.
//!
//! Thin shim: parse the request, call the service under a per-request
//! `CallContext`, map errors to statuses. Shutting down cancels the
//! contexts of requests still in flight.

mod error;
mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;

use taskscope_core::QueryService;
use taskscope_core::config::UiConfig;
use tokio_util::sync::CancellationToken;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: QueryService,
    pub ui: UiConfig,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: QueryService, ui: UiConfig, shutdown: CancellationToken) -> Self {
        Self {
            service,
            ui,
            shutdown,
        }
    }
}

/// Start the web server and run until `shutdown` fires.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    let addr: SocketAddr = bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
pub async fn watch_signals(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => return,
    }
    tracing::info!("shutdown signal received");
    token.cancel();
}
