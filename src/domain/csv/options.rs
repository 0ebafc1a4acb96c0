use serde::{Deserialize, Serialize};

use super::{HintType, TypeHint, TypeHints};

/// Tap-wide options shared by every stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapOptions {
    /// Prepend source file, mtime and line number columns to every record
    #[serde(default)]
    pub add_metadata_columns: bool,

    /// `{key, data_type}` column type overrides
    #[serde(default)]
    pub custom_mappings: Vec<TypeHint>,

    /// Columns to read as dates
    #[serde(default)]
    pub date_fields: Vec<String>,
}

impl TapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata_columns(mut self, enabled: bool) -> Self {
        self.add_metadata_columns = enabled;
        self
    }

    pub fn with_mapping(mut self, key: impl Into<String>, data_type: HintType) -> Self {
        self.custom_mappings.push(TypeHint::new(key, data_type));
        self
    }

    pub fn with_date_field(mut self, key: impl Into<String>) -> Self {
        self.date_fields.push(key.into());
        self
    }

    pub fn type_hints(&self) -> TypeHints {
        TypeHints::from_config(&self.custom_mappings, &self.date_fields)
    }
}
