//! HTTP surface (feature `server`).
//!
//! Routes:
//!
//! - `GET /` - usage hint (400)
//! - `GET /status` - catalog statistics as JSON
//! - `GET /tile/{key}/{z}/{x}/{y}` - tile by slippy-map address
//! - `GET /tile/{key}/{quadkey}` - tile by quadkey
//! - `GET /tile/{key}/` - the root tile (empty quadkey)
//!
//! Errors are `text/plain` bodies holding the message and a newline.

mod response;
mod routes;

pub use response::{status_for, ApiError};
pub use routes::router;

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::TileCatalog;
use crate::engine::RasterEngine;

/// Errors from running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind a listener on `addr`.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve the catalog until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve<E: RasterEngine>(
    listener: TcpListener,
    catalog: Arc<TileCatalog<E>>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, sources = catalog.identifiers().len(), "Tile server listening");

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Tile server stopped");
    Ok(())
}
