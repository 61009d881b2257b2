use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::distance::DistanceMatrix;
use crate::server::handlers::{get_distance_matrix, get_model_info, predict};
use crate::server::metrics::ServiceStats;
use crate::server::prediction::Predictor;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub distance: Arc<dyn DistanceMatrix>,
    pub stats: Arc<ServiceStats>,
}

impl AppState {
    pub fn new(predictor: Predictor, distance: Arc<dyn DistanceMatrix>) -> Self {
        Self {
            predictor: Arc::new(predictor),
            distance,
            stats: Arc::new(ServiceStats::new()),
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/distance", get(get_distance_matrix))
        .route("/distance/", get(get_distance_matrix))
        .route("/model", get(get_model_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(app_state)
}
