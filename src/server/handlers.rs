use std::time::Instant;

use axum::extract::{Json, Query, State};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::server::api::{ApiResult, DistanceQuery, ModelInfo, PredictionRequest, PredictionResponse};
use crate::server::server::AppState;

pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictionRequest>,
) -> ApiResult<Json<PredictionResponse>> {
    debug!(?payload, "received input data");
    let start_time = Instant::now();

    match state.predictor.predict(&payload) {
        Ok(prediction) => {
            state.stats.record_prediction(prediction.len(), start_time.elapsed());
            info!(?prediction, "prediction");
            Ok(Json(PredictionResponse { prediction }))
        }
        Err(e) => {
            state.stats.record_prediction_error();
            error!(error = ?e, "prediction failed");
            Err(e.into())
        }
    }
}

pub async fn get_distance_matrix(
    State(state): State<AppState>,
    Query(query): Query<DistanceQuery>,
) -> ApiResult<Json<Value>> {
    let result = state.distance.lookup(&query.origin, &query.destination).await;
    state.stats.record_distance(result.is_ok());

    match result {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            error!(error = ?e, origin = %query.origin, destination = %query.destination, "distance lookup failed");
            Err(e.into())
        }
    }
}

pub async fn get_model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let model = state.predictor.model();
    Json(ModelInfo {
        kind: model.kind().to_string(),
        feature_names: model.feature_names().to_vec(),
        stats: state.stats.snapshot(),
    })
}
