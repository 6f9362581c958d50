//! Feature Schema Artifacts
//!
//! Declares the ordered column layout and input fields a trained model expects.

mod error;
mod field;
mod schema;

pub use error::SchemaError;
pub use field::{FieldKind, FieldSpec};
pub use schema::{indicator_column, FeatureSchema, FORMAT_VERSION};
