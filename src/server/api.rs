use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::server::distance::DistanceError;
use crate::server::metrics::StatsSnapshot;
use crate::server::prediction::PredictError;

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictError),
    #[error("{0}")]
    Distance(#[from] DistanceError),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned to callers
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// A numeric table cell as sent by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl Cell {
    /// Float value of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Cell::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Shipment batch for `/predict`; every list holds one entry per shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PredictionRequest {
    pub no_of_items: Vec<Cell>,
    pub expected_delivery_days: Vec<Cell>,
    pub shipment_date: Vec<String>,
    pub expected_date: Vec<String>,
    pub distance_km: Vec<Cell>,
    /// Accepted but ignored, the weekend count is derived from the dates
    #[serde(default)]
    pub num_weekend: Vec<serde_json::Value>,
    /// Accepted but ignored, the holiday count is derived from the dates
    #[serde(default)]
    pub num_ph: Vec<serde_json::Value>,
    pub type_of_item_express_documents: Vec<Cell>,
    pub type_of_item_others: Vec<Cell>,
    pub type_of_item_packages_and_parcels: Vec<Cell>,
}

/// Prediction response
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: Vec<f64>,
}

/// Query string of `/distance/`
#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub origin: String,
    pub destination: String,
}

/// Model information response
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub feature_names: Vec<String>,
    pub stats: StatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_info_serializes_stats() {
        let info = ModelInfo {
            kind: "linear".to_string(),
            feature_names: vec!["NO_OF_ITEMS".to_string()],
            stats: crate::server::metrics::ServiceStats::new().snapshot(),
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["kind"], "linear");
        assert_eq!(value["stats"]["prediction_count"], 0);
    }

    #[test]
    fn test_error_body_shape() {
        let value = serde_json::to_value(ErrorBody {
            detail: "Prediction failed: boom".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"detail": "Prediction failed: boom"}));
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(Cell::Flag(true).as_f64(), Some(1.0));
        assert_eq!(Cell::Flag(false).as_f64(), Some(0.0));
        assert_eq!(Cell::Text(" 12 ".to_string()).as_f64(), Some(12.0));
        assert_eq!(Cell::Text("twelve".to_string()).as_f64(), None);
    }

    #[test]
    fn test_request_field_names() {
        let body = json!({
            "NO_OF_ITEMS": [2],
            "EXPECTED_DELIVERY_DAYS": [3],
            "SHIPMENT_DATE": ["2024-01-01"],
            "EXPECTED_DATE": ["2024-01-04"],
            "DISTANCE_KM": [120.5],
            "NUM_WEEKEND": [0],
            "NUM_PH": [0],
            "TYPE_OF_ITEM_EXPRESS_DOCUMENTS": [true],
            "TYPE_OF_ITEM_OTHERS": [0],
            "TYPE_OF_ITEM_PACKAGES_AND_PARCELS": [false]
        });

        let request: PredictionRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.distance_km, vec![Cell::Number(120.5)]);
        assert_eq!(request.type_of_item_express_documents, vec![Cell::Flag(true)]);
        assert_eq!(request.num_ph.len(), 1);
    }

    #[test]
    fn test_request_without_derived_fields() {
        let body = json!({
            "NO_OF_ITEMS": [1],
            "EXPECTED_DELIVERY_DAYS": [1],
            "SHIPMENT_DATE": ["2024-01-01"],
            "EXPECTED_DATE": ["2024-01-02"],
            "DISTANCE_KM": [1],
            "TYPE_OF_ITEM_EXPRESS_DOCUMENTS": [0],
            "TYPE_OF_ITEM_OTHERS": [1],
            "TYPE_OF_ITEM_PACKAGES_AND_PARCELS": [0]
        });

        let request: PredictionRequest = serde_json::from_value(body).unwrap();
        assert!(request.num_weekend.is_empty());
    }
}
