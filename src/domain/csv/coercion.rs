use std::fmt;

use super::{ColumnType, FieldValue};

/// A cell that could not be converted to its column's declared type.
/// The raw string is kept and ingestion continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionWarning {
    ValueCoercion { value: String, target: ColumnType },
    UnrecognizedDateFormat { value: String },
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionWarning::ValueCoercion { value, target } => {
                write!(f, "Failed to cast {:?} to {}", value, target)
            }
            CoercionWarning::UnrecognizedDateFormat { value } => {
                write!(f, "Date format not recognized for value: {:?}", value)
            }
        }
    }
}

/// Best-effort conversion result
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: FieldValue,
    pub warning: Option<CoercionWarning>,
}

impl Coerced {
    pub fn ok(value: FieldValue) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// Keep the raw string and attach a warning
    pub fn fallback(raw: &str, warning: CoercionWarning) -> Self {
        Self {
            value: FieldValue::String(raw.to_string()),
            warning: Some(warning),
        }
    }

    pub fn was_coerced(&self) -> bool {
        self.warning.is_none()
    }
}
