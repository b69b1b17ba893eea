use thiserror::Error;

/// Caller mistakes in a request payload or query. Always a 4xx.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Field '{0}' cannot be null")]
    NullField(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("Request body must be a JSON object")]
    NotAnObject,
}
