use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::traits::features::FEATURE_NAMES;
use crate::traits::model::{Model, ModelError};

pub mod forest;
pub mod linears;

use forest::TreeEnsemble;
use linears::LinearRegression;

/// On-disk model artifact, tagged by model family
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegression),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Validate the artifact and turn it into a shareable model handle
    pub fn into_model(self) -> Result<Arc<dyn Model>, ModelError> {
        let model: Arc<dyn Model> = match self {
            ModelArtifact::Linear(model) => {
                model.check()?;
                Arc::new(model)
            }
            ModelArtifact::TreeEnsemble(model) => {
                model.check()?;
                Arc::new(model)
            }
        };

        check_feature_names(model.feature_names())?;
        Ok(model)
    }
}

/// The model must have been fitted on exactly the service's feature columns
fn check_feature_names(names: &[String]) -> Result<(), ModelError> {
    if names.len() != FEATURE_NAMES.len() || names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
        return Err(ModelError::InvalidArtifact(format!(
            "Model feature names {:?} do not match {:?}",
            names, FEATURE_NAMES
        )));
    }
    Ok(())
}

/// Load a model artifact from a JSON file
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Model>, ModelError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let artifact: ModelArtifact = serde_json::from_reader(reader)?;
    artifact.into_model()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feature_names_json() -> String {
        serde_json::to_string(&FEATURE_NAMES).unwrap()
    }

    fn write_artifact(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_linear_artifact() {
        let json = format!(
            r#"{{"kind": "linear", "feature_names": {}, "intercept": 1.0, "coefficients": [1, 0, 0, 0, 0, 0, 0, 0]}}"#,
            feature_names_json()
        );
        let file = write_artifact(&json);

        let model = load_model(file.path()).unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.feature_names().len(), 8);
    }

    #[test]
    fn test_load_tree_artifact() {
        let json = format!(
            r#"{{"kind": "tree_ensemble", "feature_names": {}, "aggregation": "mean",
                "trees": [{{"nodes": [{{"feature": 2, "threshold": 100.0, "left": 1, "right": 2}}, {{"value": 2.0}}, {{"value": 4.0}}]}}]}}"#,
            feature_names_json()
        );
        let file = write_artifact(&json);

        let model = load_model(file.path()).unwrap();
        assert_eq!(model.kind(), "random_forest");
    }

    #[test]
    fn test_load_rejects_wrong_feature_names() {
        let json = r#"{"kind": "linear", "feature_names": ["a"], "intercept": 0.0, "coefficients": [1.0]}"#;
        let file = write_artifact(json);

        let result = load_model(file.path());
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_model("/nonexistent/CC_model.json");
        assert!(matches!(result, Err(ModelError::IoError(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let file = write_artifact("not json");
        let result = load_model(file.path());
        assert!(matches!(result, Err(ModelError::SerializationError(_))));
    }
}
