//! Feature Encoding and Alignment
//!
//! Converts heterogeneous form input into the fixed-order numeric row a
//! trained model consumes, without callers knowing the column order.

mod encoder;
mod input;

pub use encoder::{Encoder, FeatureRow};
pub use input::{RawInput, RawValue};

use thiserror::Error;

/// Errors while validating and encoding a request row
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// A declared field is absent from the raw input
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Value has the wrong shape for the declared field kind
    #[error("{field}: expected a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// Numeric value outside the declared range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Numeric value is NaN or infinite
    #[error("{field}: value is not finite")]
    NotFinite { field: String },

    /// Category was never observed at training time
    #[error("{field}: unknown category {category:?}")]
    UnknownCategory { field: String, category: String },
}
