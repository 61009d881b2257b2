use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::traits::model::{Model, ModelError};

/// A node of a fitted regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Rows with `row[feature] <= threshold` go to `left`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Children must point forward in the node list, which also rules out cycles.
    fn check(&self, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidArtifact("Empty tree".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::InvalidArtifact(format!(
                            "Node {} splits on feature {} but the model has {} features",
                            index, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::InvalidArtifact(format!("Node {} has a NaN threshold", index)));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(ModelError::InvalidArtifact(format!(
                                "Node {} has invalid child index {}",
                                index, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::InvalidArtifact(format!("Leaf {} is not finite", index)));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf
    fn evaluate(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return *value,
            }
        }
    }
}

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of the trees (random forest)
    Mean,
    /// `base_score + learning_rate * sum` (gradient boosting)
    Sum,
}

fn default_learning_rate() -> f64 {
    1.0
}

/// Pre-fitted ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    feature_names: Vec<String>,
    aggregation: Aggregation,
    #[serde(default)]
    base_score: f64,
    #[serde(default = "default_learning_rate")]
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn new(
        feature_names: Vec<String>,
        aggregation: Aggregation,
        base_score: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    ) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            aggregation,
            base_score,
            learning_rate,
            trees,
        };
        model.check()?;
        Ok(model)
    }

    pub(crate) fn check(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("Ensemble has no trees".to_string()));
        }
        if !self.base_score.is_finite() || !self.learning_rate.is_finite() {
            return Err(ModelError::InvalidArtifact("Non-finite ensemble parameter".to_string()));
        }
        for tree in &self.trees {
            tree.check(self.feature_names.len())?;
        }
        Ok(())
    }
}

impl Model for TreeEnsemble {
    fn kind(&self) -> &'static str {
        match self.aggregation {
            Aggregation::Mean => "random_forest",
            Aggregation::Sum => "gradient_boosting",
        }
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: row.len(),
                context: "Feature dimension doesn't match tree ensemble".to_string(),
            });
        }

        let total: f64 = self.trees.iter().map(|tree| tree.evaluate(row)).sum();

        Ok(match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + self.learning_rate * total,
        })
    }
}
