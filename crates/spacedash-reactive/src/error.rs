//! Error types for binding registration and dispatch.

use thiserror::Error;

/// Result type alias for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;

#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("output {0} is already bound")]
    DuplicateOutput(String),

    #[error("binding for {0} declares no inputs")]
    NoInputs(String),

    #[error("no binding reads input {0}")]
    UnknownInput(String),

    #[error("no binding produces output {0}")]
    UnknownOutput(String),

    #[error("input {input} has no value yet (needed by {output})")]
    MissingInput { output: String, input: String },

    #[error("input {input} expected a {expected} value")]
    InputType {
        input: String,
        expected: &'static str,
    },
}
