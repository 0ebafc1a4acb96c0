// ============================================================
// COLUMN SCHEMA
// ============================================================
// Ordered column list inferred once per stream

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::ColumnType;

pub const SDC_SOURCE_FILE_COLUMN: &str = "_sdc_source_file";
pub const SDC_SOURCE_FILE_MTIME_COLUMN: &str = "_sdc_source_file_mtime";
pub const SDC_SOURCE_LINENO_COLUMN: &str = "_sdc_source_lineno";

/// A single named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column list for one stream.
///
/// Column order follows the source header. When provenance columns are
/// enabled they come first, in the fixed order file, mtime, lineno; raw rows
/// are extended with provenance values in that same order before being
/// zipped against [`ColumnSchema::names`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<Column>,

    /// Whether the three provenance columns lead the list
    has_metadata: bool,
}

impl ColumnSchema {
    /// Build a schema from data columns, optionally prepending provenance columns
    pub fn new(data_columns: Vec<Column>, with_metadata: bool) -> Self {
        let mut columns = Vec::with_capacity(data_columns.len() + 3);
        if with_metadata {
            columns.extend(Self::metadata_columns());
        }
        columns.extend(data_columns);

        Self {
            columns,
            has_metadata: with_metadata,
        }
    }

    /// The fixed provenance columns, in emission order
    pub fn metadata_columns() -> [Column; 3] {
        [
            Column::new(SDC_SOURCE_FILE_COLUMN, ColumnType::String),
            Column::new(SDC_SOURCE_FILE_MTIME_COLUMN, ColumnType::DateTime),
            Column::new(SDC_SOURCE_LINENO_COLUMN, ColumnType::Integer),
        ]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_metadata(&self) -> bool {
        self.has_metadata
    }

    /// Columns that came from the source header
    pub fn data_columns(&self) -> &[Column] {
        let skip = if self.has_metadata { 3 } else { 0 };
        &self.columns[skip..]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// JSON-schema style descriptor: one property per column, in column order
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for column in &self.columns {
            let mut property = Map::new();
            property.insert("type".into(), json!(column.column_type.json_type()));
            if let Some(format) = column.column_type.json_format() {
                property.insert("format".into(), json!(format));
            }
            properties.insert(column.name.clone(), Value::Object(property));
        }

        json!({
            "type": "object",
            "properties": properties,
        })
    }
}
