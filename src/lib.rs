//! Courier ETA: delivery time prediction service
//!
//! Loads a pre-fitted regression model, derives weekend and public-holiday
//! counts for each shipment batch, and serves predictions over HTTP next to a
//! proxy for the Google distance matrix API.

pub mod calendar;
pub mod config;
pub mod models;
pub mod server;
pub mod traits;

// Re-export key types for ergonomic use
pub use calendar::{count_weekends_and_holidays, CalendarError, DayCounts, MalaysiaCalendar};
pub use models::{load_model, ModelArtifact};
pub use traits::calendar::HolidayCalendar;
pub use traits::features::{FeatureTable, FEATURE_NAMES};
pub use traits::model::{Model, ModelError};

// Re-export API structures for ease of use
pub use server::api::{ApiError, ApiResult, ModelInfo, PredictionRequest, PredictionResponse};
pub use server::server::{create_router, AppState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that key types are exported and accessible
        let _calendar = MalaysiaCalendar::new();
        let _counts = DayCounts::default();
        assert_eq!(FEATURE_NAMES.len(), 8);
    }
}
