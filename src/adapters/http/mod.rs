//! HTTP entry point: the upload form and the multipart upload route.
//!
//! Handlers decode and validate, then hand the photo to the ingest lane and
//! answer immediately. They never crop or resize.

pub mod home;
pub mod upload;

use crate::application::worker::IngestHandle;
use crate::domain::sizes::{KeyScheme, SizeSpec};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Shared, read-only request state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub ingest: IngestHandle,
    pub sizes: SizeSpec,
    pub key_scheme: KeyScheme,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/upload", post(upload::upload_photo).get(home::home))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
