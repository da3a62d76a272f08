//! Route table and handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, error, warn};

use super::response::{text, ApiError};
use crate::cache::{CatalogStats, SourceSummary, TileCatalog};
use crate::coord::{quadkey, TileKey};
use crate::engine::RasterEngine;

const USAGE: &str = "Need paths: .../tile/{key}/{z}/{x}/{y}";
const NOT_AN_INTEGER: &str = "Parameters 'z/x/y' need be a integer number";

type Catalog<E> = Arc<TileCatalog<E>>;

/// Build the router for a shared catalog.
pub fn router<E: RasterEngine>(catalog: Catalog<E>) -> Router {
    Router::new()
        .route("/", get(usage))
        .route("/status", get(status::<E>))
        .route("/tile/:key/:z/:x/:y", get(tile_by_address::<E>))
        .route("/tile/:key/:quadkey", get(tile_by_quadkey::<E>))
        .route("/tile/:key/", get(root_tile::<E>))
        .with_state(catalog)
}

async fn usage() -> Response {
    debug!("Usage requested");
    text(StatusCode::BAD_REQUEST, USAGE)
}

#[derive(Serialize)]
struct StatusBody {
    stats: CatalogStats,
    sources: Vec<SourceSummary>,
}

async fn status<E: RasterEngine>(State(catalog): State<Catalog<E>>) -> Json<StatusBody> {
    Json(StatusBody {
        stats: catalog.stats(),
        sources: catalog.source_summaries(),
    })
}

async fn tile_by_address<E: RasterEngine>(
    State(catalog): State<Catalog<E>>,
    Path((source, z, x, y)): Path<(String, String, String, String)>,
) -> Response {
    match parse_address(&z, &x, &y) {
        Ok(key) => respond(&catalog, &source, key).await,
        Err(e) => reject(&source, e),
    }
}

async fn tile_by_quadkey<E: RasterEngine>(
    State(catalog): State<Catalog<E>>,
    Path((source, quad_key)): Path<(String, String)>,
) -> Response {
    match quadkey::decode(&quad_key) {
        Ok(key) => respond(&catalog, &source, key).await,
        Err(e) => reject(&source, e.into()),
    }
}

/// The empty quadkey names the single zoom-0 tile.
async fn root_tile<E: RasterEngine>(
    State(catalog): State<Catalog<E>>,
    Path(source): Path<String>,
) -> Response {
    respond(&catalog, &source, TileKey::root()).await
}

/// Parse `z/x/y` path segments. Each must be a non-empty run of ASCII digits.
fn parse_address(z: &str, x: &str, y: &str) -> Result<TileKey, ApiError> {
    let is_integer = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(is_integer(z) && is_integer(x) && is_integer(y)) {
        return Err(ApiError::BadRequest(NOT_AN_INTEGER.to_string()));
    }

    let out_of_range = || ApiError::BadRequest(format!("Tile {z}/{x}/{y} does not exist"));
    let zoom: u8 = z.parse().map_err(|_| out_of_range())?;
    let col: u32 = x.parse().map_err(|_| out_of_range())?;
    let row: u32 = y.parse().map_err(|_| out_of_range())?;

    Ok(TileKey::new(zoom, col, row)?)
}

async fn respond<E: RasterEngine>(catalog: &TileCatalog<E>, source: &str, key: TileKey) -> Response {
    match catalog.get_tile(source, key).await {
        Ok(tile) => {
            debug!(source, tile = %key, bytes = tile.len(), "Tile served");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, tile.mime_type())],
                tile.into_bytes(),
            )
                .into_response()
        }
        Err(e) => reject(source, ApiError::Tile(e)),
    }
}

fn reject(source: &str, e: ApiError) -> Response {
    let status = e.status();
    if status.is_server_error() {
        error!(source, status = status.as_u16(), error = %e.message(), "Tile request failed");
    } else {
        warn!(source, status = status.as_u16(), error = %e.message(), "Tile request rejected");
    }
    e.into_response()
}
