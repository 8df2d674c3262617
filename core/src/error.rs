//! Error types for the reseller API client.
//!
//! # Design
//! Every failure is a value of [`ApiError`]. Pre-flight problems
//! (`Validation`, `MissingRequiredField`, `InvalidIdentifier`) are caller
//! correctable; `Format` and `Deserialization` mean the upstream sent
//! something the mapping layer cannot read; `Upstream` carries the API's own
//! `{status, message}` envelope. Nothing here is retried.

use std::fmt;

use thiserror::Error;

use crate::codec::ScalarKind;
use crate::field::TagError;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field path, dotted for nested values (`address.city`).
    pub field: String,
    /// Short rule name, e.g. `required` or `max_len`.
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A JSON leaf that could not be read as the expected scalar kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {raw:?} as {kind}")]
pub struct FormatError {
    pub kind: ScalarKind,
    pub raw: String,
}

/// Errors returned by the mapping layer and `ResellerClient` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The value failed one or more validation rules before encoding.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    /// A required field was zero when the form was encoded or resolved.
    #[error("{0} must not be empty")]
    MissingRequiredField(String),

    /// An upstream scalar could not be parsed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The upstream answered with a non-200 status and a `{status, message}` body.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The encoded form could not be rendered as `x-www-form-urlencoded`.
    #[error("form encoding failed: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// A field table declaration is malformed.
    #[error(transparent)]
    Tag(#[from] TagError),

    /// A field declared as nested does not encode as a nested value.
    #[error("field {0} is declared nested but is a plain value")]
    NotNested(&'static str),

    /// An identifier argument is not a decimal number.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The upstream acknowledged the call but reported failure.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// Client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
