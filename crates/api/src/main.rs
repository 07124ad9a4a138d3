use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use repodeck_hosting::{GitHubApi, HostingPlatform, MemoryHosting};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repodeck_api::config::{HostingBackend, ServerConfig};
use repodeck_api::router::build_app_router;
use repodeck_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "repodeck_api=debug,repodeck_control=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Hosting platform ---
    let platform: Arc<dyn HostingPlatform> = match &config.hosting {
        HostingBackend::GitHub(hosting) => {
            tracing::info!(
                api_url = %hosting.api_url,
                organization = ?hosting.organization,
                "Using GitHub hosting backend",
            );
            Arc::new(GitHubApi::new(hosting.clone()).expect("Failed to build GitHub client"))
        }
        HostingBackend::Memory { owner } => {
            tracing::warn!(%owner, "Using in-memory hosting backend, state is lost on exit");
            Arc::new(MemoryHosting::new(owner.clone()))
        }
    };

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config),
        platform,
    };

    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // The drain deadline starts when the shutdown signal arrives. Control
    // plane operations are not cancellable, so a scaffold cut off here
    // stays partial on the hosting platform.
    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        match signal_rx.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown drain timed out with requests still in flight",
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
