use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::traits::model::{Model, ModelError};

/// Pre-fitted linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Column names the coefficients line up with
    feature_names: Vec<String>,
    /// Bias term
    #[serde(default)]
    intercept: f64,
    /// One weight per feature
    coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Create a new Linear Regression model from fitted parameters
    pub fn new(feature_names: Vec<String>, intercept: f64, coefficients: Vec<f64>) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            intercept,
            coefficients,
        };
        model.check()?;
        Ok(model)
    }

    /// Verify the parameters are consistent with each other
    pub(crate) fn check(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::InvalidArtifact("Empty coefficients".to_string()));
        }

        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: self.coefficients.len(),
                context: "coefficients vs feature names".to_string(),
            });
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidArtifact("Non-finite parameter".to_string()));
        }

        Ok(())
    }
}

impl Model for LinearRegression {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        if row.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: row.len(),
                context: "Feature dimension doesn't match model weights".to_string(),
            });
        }

        let weights = ArrayView1::from(self.coefficients.as_slice());
        Ok(self.intercept + row.dot(&weights))
    }
}
