//! Loop Feed Service Main Entry Point
//!
//! This is the main binary for the Loop feed service. It serves the vote,
//! thread, and trending endpoints over HTTP on top of PostgreSQL.

use std::sync::Arc;

use dotenv::dotenv;
use loop_feed::{Dependencies, StartupError};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("loop_feed=info,loop_feed_engine=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!(
        service_name = "loop-feed",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting Loop feed service");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            Arc::new(deps)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let addr = format!("0.0.0.0:{}", deps.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    let app = loop_feed::http::router(deps);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Loop feed service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
