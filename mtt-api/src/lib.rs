//! mtt-api library - the music Turing test backend service
//!
//! Serves the genre-comparison analysis bundle, random tracks for the
//! listening test, and rating submission over a JSON HTTP API.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use mtt_common::config::ServiceConfig;

pub mod analysis;
pub mod api;
pub mod sampler;

use sampler::Sampler;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service settings (port, debug mode, media base URL, sampling)
    pub config: Arc<ServiceConfig>,
    /// Seedable random source for track selection
    pub sampler: Arc<Sampler>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: ServiceConfig) -> Self {
        let sampler = Arc::new(Sampler::new(config.sampler_seed));
        Self {
            db,
            config: Arc::new(config),
            sampler,
        }
    }

    /// Log a processing failure with full detail and turn it into the
    /// API error the caller sees: the detailed message in debug mode, a
    /// generic one otherwise.
    pub(crate) fn internal(&self, err: impl std::fmt::Display) -> api::ApiError {
        error!("Request failed: {}", err);
        if self.config.debug {
            api::ApiError::Internal(err.to_string())
        } else {
            api::ApiError::Internal("An unexpected error occurred".to_string())
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/feature-analysis", get(api::feature_analysis))
        .route("/api/music", get(api::list_music))
        .route("/api/music/random", get(api::random_music))
        .route("/api/music/:id", get(api::get_music))
        .route("/api/ratings", get(api::list_ratings))
        .route("/api/ratings/rate-song", post(api::rate_song))
        .route("/api/ratings/song-ratings", get(api::song_ratings))
        .route("/api/ratings/:id", get(api::get_rating))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
