//! Field Declarations

use serde::{Deserialize, Serialize};

use crate::schema::indicator_column;

/// Kind of a user-facing input field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Continuous numeric input with an allowed range
    Numeric { min: f64, max: f64, default: f64 },
    /// Single-choice categorical input
    Categorical {
        /// Categories observed at training time, in training order
        categories: Vec<String>,
        /// Category dropped by the reduced one-hot encoding
        reference: String,
        /// Pre-selected category for form rendering
        default: String,
    },
}

/// A declared input field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Raw field name, also the stem of any derived column names
    pub name: String,
    /// Human-readable label for form rendering
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Shorthand for a numeric field declaration
    pub fn numeric(name: &str, label: &str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Numeric { min, max, default },
        }
    }

    /// Shorthand for a categorical field declaration.
    ///
    /// The first category is the reference (dropped) category and the default.
    pub fn categorical(name: &str, label: &str, categories: &[&str]) -> Self {
        let categories: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
        let reference = categories.first().cloned().unwrap_or_default();
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Categorical {
                default: reference.clone(),
                reference,
                categories,
            },
        }
    }

    /// Column names this field can contribute to an expanded row.
    ///
    /// A numeric field contributes its own name; a categorical field one
    /// indicator column per non-reference category.
    pub fn derived_columns(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Numeric { .. } => vec![self.name.clone()],
            FieldKind::Categorical {
                categories,
                reference,
                ..
            } => categories
                .iter()
                .filter(|c| *c != reference)
                .map(|c| indicator_column(&self.name, c))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_derived_columns() {
        let field = FieldSpec::numeric("age", "Age", 0.0, 100.0, 30.0);
        assert_eq!(field.derived_columns(), vec!["age".to_string()]);
    }

    #[test]
    fn test_categorical_skips_reference() {
        let field = FieldSpec::categorical("region", "Region", &["southwest", "northeast"]);
        assert_eq!(field.derived_columns(), vec!["region_northeast".to_string()]);
    }

    #[test]
    fn test_categorical_defaults_to_reference() {
        let field = FieldSpec::categorical("sex", "Sex", &["female", "male"]);
        match field.kind {
            FieldKind::Categorical {
                reference, default, ..
            } => {
                assert_eq!(reference, "female");
                assert_eq!(default, "female");
            }
            _ => panic!("expected categorical"),
        }
    }
}
