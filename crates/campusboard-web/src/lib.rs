//! campusboard-web - REST API for campusboard using Axum

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Run the API server until the process is stopped
pub async fn run(state: AppState, addr: SocketAddr) -> Result<()> {
    let router = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
