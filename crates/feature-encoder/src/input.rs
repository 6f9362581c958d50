//! Raw Request Input

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single raw field value as supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Numeric field value, passed through unchanged
    Number(f64),
    /// Selected option label of a categorical field
    Choice(String),
}

/// One request's raw field values, built fresh per submission.
///
/// Created, encoded, consumed by a single prediction call, then discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInput {
    values: BTreeMap<String, RawValue>,
}

impl RawInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value, replacing any previous value for the name
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style numeric field
    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.insert(name, RawValue::Number(value));
        self
    }

    /// Builder-style categorical field
    pub fn with_choice(mut self, name: &str, category: &str) -> Self {
        self.insert(name, RawValue::Choice(category.to_string()));
        self
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Names of all supplied fields, in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of supplied fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawInput {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_round_trip() {
        let input = RawInput::new()
            .with_number("age", 30.0)
            .with_choice("sex", "male");

        assert_eq!(input.len(), 2);
        assert_eq!(input.get("age"), Some(&RawValue::Number(30.0)));
        assert_eq!(
            input.get("sex"),
            Some(&RawValue::Choice("male".to_string()))
        );
    }

    #[test]
    fn test_untagged_deserialization() {
        let input: RawInput =
            serde_json::from_str(r#"{"values": {"age": 30, "sex": "male"}}"#).unwrap();
        assert_eq!(input.get("age"), Some(&RawValue::Number(30.0)));
        assert_eq!(
            input.get("sex"),
            Some(&RawValue::Choice("male".to_string()))
        );
    }
}
