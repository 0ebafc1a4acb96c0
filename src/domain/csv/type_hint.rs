// ============================================================
// TYPE HINTS
// ============================================================
// Column type overrides supplied by configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ColumnType;

/// Data types a column may be declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintType {
    Date,
    Integer,
    Double,
    String,
}

impl From<HintType> for ColumnType {
    fn from(hint: HintType) -> Self {
        match hint {
            HintType::Date => ColumnType::Date,
            HintType::Integer => ColumnType::Integer,
            HintType::Double => ColumnType::Double,
            HintType::String => ColumnType::String,
        }
    }
}

/// One `{key, data_type}` mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHint {
    pub key: String,
    pub data_type: HintType,
}

impl TypeHint {
    pub fn new(key: impl Into<String>, data_type: HintType) -> Self {
        Self {
            key: key.into(),
            data_type,
        }
    }
}

/// Unified column-name to type lookup.
///
/// Built from the `{key, data_type}` mapping list and the flat list of date
/// columns. For a repeated key the first mapping entry wins, and any mapping
/// entry wins over the flat date list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHints {
    hints: HashMap<String, ColumnType>,
}

impl TypeHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(mappings: &[TypeHint], date_fields: &[String]) -> Self {
        let mut hints: HashMap<String, ColumnType> = HashMap::new();
        for mapping in mappings {
            hints
                .entry(mapping.key.clone())
                .or_insert_with(|| mapping.data_type.into());
        }
        for field in date_fields {
            hints.entry(field.clone()).or_insert(ColumnType::Date);
        }
        Self { hints }
    }

    pub fn with_hint(mut self, key: impl Into<String>, data_type: HintType) -> Self {
        self.hints.insert(key.into(), data_type.into());
        self
    }

    /// Declared type for a header column, defaulting to string
    pub fn resolve(&self, column: &str) -> ColumnType {
        self.hints.get(column).copied().unwrap_or(ColumnType::String)
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}
