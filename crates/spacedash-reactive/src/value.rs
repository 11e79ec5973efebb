//! Values held by input controls.

use serde::{Deserialize, Serialize};

use crate::error::{BindingError, BindingResult};

/// Current value of one input control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    /// Single-select choice, e.g. a dropdown.
    Text(String),
    /// Dual-handle numeric range.
    Range { low: f64, high: f64 },
}

impl ControlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn range(low: f64, high: f64) -> Self {
        Self::Range { low, high }
    }

    /// Borrow a text value, or fail naming the input it came from.
    pub fn as_text(&self, input: &str) -> BindingResult<&str> {
        match self {
            Self::Text(value) => Ok(value),
            _ => Err(BindingError::InputType {
                input: input.to_string(),
                expected: "text",
            }),
        }
    }

    pub fn as_range(&self, input: &str) -> BindingResult<(f64, f64)> {
        match self {
            Self::Range { low, high } => Ok((*low, *high)),
            _ => Err(BindingError::InputType {
                input: input.to_string(),
                expected: "range",
            }),
        }
    }
}
