//! Response validation: parses extracted JSON text and checks it against the
//! statically declared shape of the expected result before typed deserialization.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod schema;

pub use schema::{Field, SchemaViolation, Shape};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Completion is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Completion does not match the {kind} shape: {violation}")]
    SchemaMismatch {
        kind: &'static str,
        violation: SchemaViolation,
    },
}

/// A result type the pipeline can hand to callers once validated.
pub trait StructuredResult: DeserializeOwned + Serialize + Send + 'static {
    /// Human-readable name used in logs and error details.
    const KIND: &'static str;

    fn shape() -> &'static Shape;
}

/// Parses `text`, checks it against `T::shape()`, and deserializes it.
pub fn validate<T: StructuredResult>(text: &str) -> Result<T, ValidationError> {
    let mut value: Value = serde_json::from_str(text)?;

    schema::conform(&mut value, T::shape()).map_err(|violation| {
        ValidationError::SchemaMismatch {
            kind: T::KIND,
            violation,
        }
    })?;

    serde_json::from_value(value).map_err(|e| ValidationError::SchemaMismatch {
        kind: T::KIND,
        violation: SchemaViolation::new("$", e.to_string()),
    })
}
