//! HTTP surface
//!
//! Maps the four POST routes onto [`TryOnStudio`], renders every failure as
//! `500 {"error": ...}` and serves the built frontend for anything else.

pub mod handlers;
pub mod input;

use crate::studio::TryOnStudio;
use crate::Error;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<TryOnStudio>,
}

impl AppState {
    pub fn new(studio: TryOnStudio) -> Self {
        Self {
            studio: Arc::new(studio),
        }
    }
}

/// Build the application router. When `static_dir` is given, unmatched
/// requests are served from it with `index.html` as the last resort.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/generate-model", post(handlers::generate_model))
        .route("/api/extract-garment", post(handlers::extract_garment))
        .route("/api/virtual-tryon", post(handlers::virtual_try_on))
        .route("/api/pose-variation", post(handlers::pose_variation))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => api.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => api,
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        let body = Json(json!({ "error": self.client_message() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
