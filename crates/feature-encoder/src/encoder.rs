//! Encoder Implementation

use std::collections::BTreeMap;

use feature_schema::{indicator_column, FeatureSchema, FieldKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::{RawInput, RawValue};
use crate::EncodeError;

/// Fixed-length numeric row aligned to a feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Values in schema column order
    pub values: Vec<f64>,
}

impl FeatureRow {
    /// Row width
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Encodes raw request input against a feature schema.
///
/// Pure transformation: no state is kept between calls, and the same input
/// always yields the same row.
pub struct Encoder<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> Encoder<'a> {
    /// Create an encoder over a loaded schema
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Encode and align one request row.
    ///
    /// Validates every declared field, expands categoricals into indicator
    /// columns, then emits values in schema column order, substituting 0 for
    /// columns the expansion did not produce.
    pub fn encode(&self, input: &RawInput) -> Result<FeatureRow, EncodeError> {
        let expanded = self.expand(input)?;

        let values = self
            .schema
            .columns
            .iter()
            .map(|column| expanded.get(column.as_str()).copied().unwrap_or(0.0))
            .collect();

        Ok(FeatureRow { values })
    }

    /// Validate each declared field and build the expanded name → value map
    fn expand(&self, input: &RawInput) -> Result<BTreeMap<String, f64>, EncodeError> {
        let mut expanded = BTreeMap::new();

        for field in &self.schema.fields {
            let value = input
                .get(&field.name)
                .ok_or_else(|| EncodeError::MissingField(field.name.clone()))?;

            match (&field.kind, value) {
                (FieldKind::Numeric { min, max, .. }, RawValue::Number(v)) => {
                    if !v.is_finite() {
                        return Err(EncodeError::NotFinite {
                            field: field.name.clone(),
                        });
                    }
                    if v < min || v > max {
                        return Err(EncodeError::OutOfRange {
                            field: field.name.clone(),
                            value: *v,
                            min: *min,
                            max: *max,
                        });
                    }
                    expanded.insert(field.name.clone(), *v);
                }
                (FieldKind::Numeric { .. }, RawValue::Choice(_)) => {
                    return Err(EncodeError::TypeMismatch {
                        field: field.name.clone(),
                        expected: "numeric",
                    });
                }
                (
                    FieldKind::Categorical {
                        categories,
                        reference,
                        ..
                    },
                    RawValue::Choice(category),
                ) => {
                    if !categories.contains(category) {
                        return Err(EncodeError::UnknownCategory {
                            field: field.name.clone(),
                            category: category.clone(),
                        });
                    }
                    // The reference category is implicit: all indicators stay 0.
                    if category != reference {
                        expanded.insert(indicator_column(&field.name, category), 1.0);
                    }
                }
                (FieldKind::Categorical { .. }, RawValue::Number(_)) => {
                    return Err(EncodeError::TypeMismatch {
                        field: field.name.clone(),
                        expected: "categorical",
                    });
                }
            }
        }

        // Undeclared raw fields never reach the output row.
        for name in input.field_names() {
            if self.schema.field(name).is_none() {
                debug!("ignoring undeclared field {:?}", name);
            }
        }

        Ok(expanded)
    }
}
