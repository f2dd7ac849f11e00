//! Error taxonomy shared by every stage of the exposure pipeline.
//!
//! Every computation here is deterministic, so an error always means a
//! configuration or input defect. Nothing is retried or defaulted.

use thiserror::Error;

use crate::algo::InterpError;

/// Errors that can occur while loading data or simulating an exposure
#[derive(Debug, Error)]
pub enum SimError {
    /// A named resource (filter, magnitude entry, airmass table) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A physical parameter or array is outside its valid domain
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A quantity was given with a unit of the wrong physical dimension
    #[error("Unit mismatch: expected {expected}, found '{found}'")]
    UnitMismatch { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed table or configuration content
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        SimError::NotFound(msg.into())
    }
}

impl From<InterpError> for SimError {
    fn from(err: InterpError) -> Self {
        SimError::InvalidConfiguration(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::not_found("filter 'SDSS_q'");
        assert_eq!(err.to_string(), "Not found: filter 'SDSS_q'");

        let err = SimError::UnitMismatch {
            expected: "length".to_string(),
            found: "s".to_string(),
        };
        assert_eq!(err.to_string(), "Unit mismatch: expected length, found 's'");
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: SimError = bad.unwrap_err().into();
        assert!(matches!(err, SimError::Parse(_)));
    }
}
