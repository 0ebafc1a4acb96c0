// ============================================================
// COLUMN TYPE ENUM
// ============================================================
// Semantic type of a schema column and its JSON-schema shape

use serde::{Deserialize, Serialize};

/// Semantic type assigned to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Raw text, passed through unchanged
    String,

    /// Whole number (64-bit signed)
    Integer,

    /// Floating point number
    Double,

    /// Calendar date, read as `MM/DD/YY` and emitted as `YYYY-MM-DD`
    Date,

    /// UTC timestamp; only used by the source file mtime column
    DateTime,
}

impl ColumnType {
    /// JSON-schema `type` keyword for this column
    pub fn json_type(&self) -> &'static str {
        match self {
            ColumnType::String | ColumnType::Date | ColumnType::DateTime => "string",
            ColumnType::Integer => "integer",
            ColumnType::Double => "number",
        }
    }

    /// JSON-schema `format` keyword, if any
    pub fn json_format(&self) -> Option<&'static str> {
        match self {
            ColumnType::Date => Some("date"),
            ColumnType::DateTime => Some("date-time"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::DateTime => write!(f, "date-time"),
        }
    }
}
