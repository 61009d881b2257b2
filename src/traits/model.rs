use ndarray::ArrayView1;
use thiserror::Error;

use crate::traits::features::FeatureTable;

/// Errors raised by model loading and inference
#[derive(Error, Debug)]
pub enum ModelError {
    /// Errors during prediction
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// Data dimension mismatch errors
    #[error("Dimension mismatch ({context}): expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },
    /// The artifact parsed but describes an unusable model
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    /// I/O errors while reading the artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Errors from deserialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Core trait for pre-fitted regression models
pub trait Model: Send + Sync {
    /// Short identifier of the model family
    fn kind(&self) -> &'static str;

    /// Column names the model was fitted on, in order
    fn feature_names(&self) -> &[String];

    /// Make a prediction for a single row
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError>;

    /// Make predictions for every row of a table
    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        let expected = self.feature_names().len();
        if table.n_columns() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                actual: table.n_columns(),
                context: "feature table columns".to_string(),
            });
        }

        let mut predictions = Vec::with_capacity(table.n_rows());
        for i in 0..table.n_rows() {
            let prediction = self.predict_row(table.row(i))?;
            if !prediction.is_finite() {
                return Err(ModelError::PredictionError(format!(
                    "non-finite prediction for row {}",
                    i
                )));
            }
            predictions.push(prediction);
        }
        Ok(predictions)
    }
}
