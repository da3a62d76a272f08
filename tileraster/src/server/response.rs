//! Error responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::coord::CoordError;
use crate::error::TileError;

/// HTTP status for a pipeline error.
pub fn status_for(error: &TileError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Anything a tile route can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed request, rejected before reaching the catalog.
    BadRequest(String),
    Tile(TileError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Tile(e) => status_for(e),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Tile(e) => e.message(),
        }
    }
}

impl From<TileError> for ApiError {
    fn from(e: TileError) -> Self {
        ApiError::Tile(e)
    }
}

impl From<CoordError> for ApiError {
    fn from(e: CoordError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Plain-text response with a trailing newline.
pub(crate) fn text(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("{}\n", message),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        text(self.status(), &self.message())
    }
}
