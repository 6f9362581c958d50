//! Feature Schema Artifact

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SchemaError;
use crate::field::{FieldKind, FieldSpec};

/// Current schema artifact format revision
pub const FORMAT_VERSION: u32 = 1;

/// Deterministic indicator column name for a categorical field value
pub fn indicator_column(field: &str, category: &str) -> String {
    format!("{}_{}", field, category)
}

/// Ordered column layout and field set produced at training time.
///
/// Immutable after training; every inference request is reshaped to match
/// `columns` exactly, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Artifact format revision
    pub format_version: u32,
    /// Identifies the training run that produced this schema
    pub training_run: Uuid,
    /// When the training run completed
    pub trained_at: DateTime<Utc>,
    /// Name of the predicted target
    pub target: String,
    /// Declared input fields, in form order
    pub fields: Vec<FieldSpec>,
    /// Model input columns, in training order
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Load a schema artifact from disk and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Self = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        schema.validate()?;
        debug!(
            "Loaded schema for target {:?}: {} fields, {} columns",
            schema.target,
            schema.fields.len(),
            schema.columns.len()
        );
        Ok(schema)
    }

    /// Write the schema artifact to disk as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let path = path.as_ref();
        self.validate()?;
        let raw = serde_json::to_string_pretty(self).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check structural integrity of the schema.
    ///
    /// Guards against drift between the persisted column list and the field
    /// declarations, which would otherwise misalign rows without raising.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.format_version > FORMAT_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if self.columns.is_empty() {
            return Err(SchemaError::EmptyColumns);
        }

        let mut field_names = HashSet::new();
        for field in &self.fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(SchemaError::BadField {
                    field: field.name.clone(),
                    reason: "declared more than once".to_string(),
                });
            }
            field.validate()?;
        }

        // Every column must be producible by a declared field.
        let derivable: HashSet<String> = self
            .fields
            .iter()
            .flat_map(|f| f.derived_columns())
            .collect();
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
            if !derivable.contains(column.as_str()) {
                return Err(SchemaError::UnmappedColumn(column.clone()));
            }
        }

        // The reverse direction is legal (training may have pruned columns)
        // but worth surfacing: an expansion-produced column absent from the
        // column list is dropped at alignment.
        for column in derivable {
            if !seen.contains(column.as_str()) {
                warn!("schema never consumes derivable column {:?}", column);
            }
        }

        Ok(())
    }

    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of model input columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

impl FieldSpec {
    fn validate(&self) -> Result<(), SchemaError> {
        let bad = |reason: &str| SchemaError::BadField {
            field: self.name.clone(),
            reason: reason.to_string(),
        };
        match &self.kind {
            FieldKind::Numeric { min, max, default } => {
                if !min.is_finite() || !max.is_finite() || !default.is_finite() {
                    return Err(bad("range bounds must be finite"));
                }
                if min > max {
                    return Err(bad("range minimum exceeds maximum"));
                }
                if default < min || default > max {
                    return Err(bad("default outside declared range"));
                }
            }
            FieldKind::Categorical {
                categories,
                reference,
                default,
            } => {
                if categories.len() < 2 {
                    return Err(bad("needs at least two categories"));
                }
                let unique: HashSet<&str> = categories.iter().map(String::as_str).collect();
                if unique.len() != categories.len() {
                    return Err(bad("duplicate category"));
                }
                if !unique.contains(reference.as_str()) {
                    return Err(bad("reference category not in category list"));
                }
                if !unique.contains(default.as_str()) {
                    return Err(bad("default category not in category list"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medical_schema() -> FeatureSchema {
        FeatureSchema {
            format_version: FORMAT_VERSION,
            training_run: Uuid::new_v4(),
            trained_at: Utc::now(),
            target: "charges".to_string(),
            fields: vec![
                FieldSpec::numeric("age", "Age", 0.0, 100.0, 30.0),
                FieldSpec::numeric("bmi", "BMI", 10.0, 50.0, 24.0),
                FieldSpec::numeric("children", "Children", 0.0, 10.0, 0.0),
                FieldSpec::categorical("sex", "Sex", &["female", "male"]),
                FieldSpec::categorical("smoker", "Smoker", &["no", "yes"]),
                FieldSpec::categorical(
                    "region",
                    "Region",
                    &["southwest", "northeast", "northwest", "southeast"],
                ),
            ],
            columns: [
                "age",
                "bmi",
                "children",
                "sex_male",
                "smoker_yes",
                "region_northeast",
                "region_northwest",
                "region_southeast",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }

    #[test]
    fn test_valid_schema() {
        assert!(medical_schema().validate().is_ok());
    }

    #[test]
    fn test_indicator_column_naming() {
        assert_eq!(indicator_column("region", "northeast"), "region_northeast");
    }

    #[test]
    fn test_unmapped_column_rejected() {
        let mut schema = medical_schema();
        schema.columns.push("height".to_string());
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnmappedColumn(c)) if c == "height"
        ));
    }

    #[test]
    fn test_reference_indicator_rejected() {
        // The reference category never gets a column of its own.
        let mut schema = medical_schema();
        schema.columns.push("region_southwest".to_string());
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnmappedColumn(_))
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut schema = medical_schema();
        schema.columns.push("age".to_string());
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_bad_reference_rejected() {
        let mut schema = medical_schema();
        schema.fields[3] = FieldSpec {
            name: "sex".to_string(),
            label: "Sex".to_string(),
            kind: FieldKind::Categorical {
                categories: vec!["female".to_string(), "male".to_string()],
                reference: "other".to_string(),
                default: "female".to_string(),
            },
        };
        assert!(matches!(schema.validate(), Err(SchemaError::BadField { .. })));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut schema = medical_schema();
        schema.format_version = FORMAT_VERSION + 1;
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");

        let schema = medical_schema();
        schema.save(&path).unwrap();
        let loaded = FeatureSchema::load(&path).unwrap();

        assert_eq!(loaded.training_run, schema.training_run);
        assert_eq!(loaded.columns, schema.columns);
        assert_eq!(loaded.fields.len(), schema.fields.len());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            FeatureSchema::load("/nonexistent/schema.json"),
            Err(SchemaError::Io { .. })
        ));
    }
}
