//! Model Artifact Implementation

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::tree::DecisionTree;
use crate::ModelError;

/// Current model artifact format revision
pub const FORMAT_VERSION: u32 = 1;

/// Task the model was trained for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum ModelKind {
    /// Predicts a single scalar
    Regression,
    /// Predicts one of a fixed set of labels
    Classification { classes: Vec<String> },
}

impl ModelKind {
    /// Number of outputs each tree leaf carries
    pub fn n_outputs(&self) -> usize {
        match self {
            ModelKind::Regression => 1,
            ModelKind::Classification { classes } => classes.len(),
        }
    }

    /// Short task name for diagnostics and API responses
    pub fn task_name(&self) -> &'static str {
        match self {
            ModelKind::Regression => "regression",
            ModelKind::Classification { .. } => "classification",
        }
    }
}

/// Result of one prediction call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelOutput {
    /// Regression scalar
    Value(f64),
    /// Classification label with the averaged class scores
    Label {
        label: String,
        confidence: f64,
        probabilities: Vec<f64>,
    },
}

/// A pre-trained tree ensemble, loaded once and read-only thereafter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact format revision
    pub format_version: u32,
    /// Identifies the training run that produced this model
    pub training_run: Uuid,
    /// When the training run completed
    pub trained_at: DateTime<Utc>,
    /// Task and output layout
    pub kind: ModelKind,
    /// Feature count every input row must match
    pub n_features: usize,
    trees: Vec<DecisionTree>,
}

impl ModelArtifact {
    /// Assemble and validate an artifact from its parts
    pub fn new(
        training_run: Uuid,
        trained_at: DateTime<Utc>,
        kind: ModelKind,
        n_features: usize,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelError> {
        let artifact = Self {
            format_version: FORMAT_VERSION,
            training_run,
            trained_at,
            kind,
            n_features,
            trees,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Load a model artifact from disk and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        artifact.validate()?;
        debug!(
            "Loaded {} model: {} trees over {} features",
            artifact.kind.task_name(),
            artifact.trees.len(),
            artifact.n_features
        );
        Ok(artifact)
    }

    /// Write the artifact to disk as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        self.validate()?;
        let raw = serde_json::to_string_pretty(self).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check structural invariants of the whole ensemble
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version > FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if self.n_features == 0 {
            return Err(ModelError::Malformed("model expects no features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("model has no trees".to_string()));
        }
        if let ModelKind::Classification { classes } = &self.kind {
            if classes.len() < 2 {
                return Err(ModelError::Malformed(
                    "classification needs at least two classes".to_string(),
                ));
            }
        }
        let n_outputs = self.kind.n_outputs();
        for tree in &self.trees {
            tree.validate(self.n_features, n_outputs)?;
        }
        Ok(())
    }

    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Run the ensemble on one aligned feature row.
    ///
    /// Regression averages the tree outputs; classification averages the
    /// per-class scores and reports the argmax.
    pub fn predict(&self, row: &[f64]) -> Result<ModelOutput, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::InvalidInputShape {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut scores = vec![0.0; self.kind.n_outputs()];
        for tree in &self.trees {
            let leaf = tree.evaluate(row)?;
            for (score, value) in scores.iter_mut().zip(leaf) {
                *score += value;
            }
        }
        let n_trees = self.trees.len() as f64;
        for score in scores.iter_mut() {
            *score /= n_trees;
        }

        match &self.kind {
            ModelKind::Regression => Ok(ModelOutput::Value(scores[0])),
            ModelKind::Classification { classes } => {
                let best = scores
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                Ok(ModelOutput::Label {
                    label: classes[best].clone(),
                    confidence: scores[best],
                    probabilities: scores,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;

    fn regression_model() -> ModelArtifact {
        // Two stumps over [age, smoker_yes]; averaged output.
        let trees = vec![
            DecisionTree {
                nodes: vec![
                    Node::Split {
                        feature: 1,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf {
                        values: vec![8_000.0],
                    },
                    Node::Leaf {
                        values: vec![32_000.0],
                    },
                ],
            },
            DecisionTree {
                nodes: vec![
                    Node::Split {
                        feature: 0,
                        threshold: 45.0,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf {
                        values: vec![6_000.0],
                    },
                    Node::Leaf {
                        values: vec![14_000.0],
                    },
                ],
            },
        ];
        ModelArtifact::new(
            Uuid::new_v4(),
            Utc::now(),
            ModelKind::Regression,
            2,
            trees,
        )
        .unwrap()
    }

    fn classification_model() -> ModelArtifact {
        let trees = vec![DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 206.0,
                    left: 1,
                    right: 2,
                },
                Node::Leaf {
                    values: vec![0.8, 0.2, 0.0],
                },
                Node::Leaf {
                    values: vec![0.05, 0.05, 0.9],
                },
            ],
        }];
        ModelArtifact::new(
            Uuid::new_v4(),
            Utc::now(),
            ModelKind::Classification {
                classes: vec![
                    "Adelie".to_string(),
                    "Chinstrap".to_string(),
                    "Gentoo".to_string(),
                ],
            },
            1,
            trees,
        )
        .unwrap()
    }

    #[test]
    fn test_regression_averages_trees() {
        let model = regression_model();
        // Non-smoker, age 30: (8000 + 6000) / 2.
        match model.predict(&[30.0, 0.0]).unwrap() {
            ModelOutput::Value(v) => assert_eq!(v, 7_000.0),
            other => panic!("unexpected output: {:?}", other),
        }
        // Smoker, age 50: (32000 + 14000) / 2.
        match model.predict(&[50.0, 1.0]).unwrap() {
            ModelOutput::Value(v) => assert_eq!(v, 23_000.0),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_classification_reports_argmax() {
        let model = classification_model();
        match model.predict(&[215.0]).unwrap() {
            ModelOutput::Label {
                label,
                confidence,
                probabilities,
            } => {
                assert_eq!(label, "Gentoo");
                assert!((confidence - 0.9).abs() < 1e-9);
                assert_eq!(probabilities.len(), 3);
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_width_rejected() {
        let model = regression_model();
        assert!(matches!(
            model.predict(&[30.0]),
            Err(ModelError::InvalidInputShape {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_empty_forest_rejected() {
        let result = ModelArtifact::new(
            Uuid::new_v4(),
            Utc::now(),
            ModelKind::Regression,
            2,
            Vec::new(),
        );
        assert!(matches!(result, Err(ModelError::Malformed(_))));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = regression_model();
        model.save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();

        assert_eq!(loaded.training_run, model.training_run);
        assert_eq!(loaded.n_features, model.n_features);
        assert_eq!(loaded.n_trees(), model.n_trees());
    }

    #[test]
    fn test_load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ModelArtifact::load(&path),
            Err(ModelError::Parse { .. })
        ));
    }
}
