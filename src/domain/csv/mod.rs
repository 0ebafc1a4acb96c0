// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for CSV record streaming
// No I/O, no async

mod coercion;
mod column_schema;
mod column_type;
mod file_config;
mod options;
mod record;
mod type_hint;

pub use coercion::{Coerced, CoercionWarning};
pub use column_schema::{
    Column, ColumnSchema, SDC_SOURCE_FILE_COLUMN, SDC_SOURCE_FILE_MTIME_COLUMN,
    SDC_SOURCE_LINENO_COLUMN,
};
pub use column_type::ColumnType;
pub use file_config::{Dialect, FileConfig};
pub use options::TapOptions;
pub use record::{FieldValue, Record};
pub use type_hint::{HintType, TypeHint, TypeHints};

/// Partition context handed down by a calling pipeline.
/// Accepted by the record stream and otherwise unused.
pub type StreamContext = serde_json::Map<String, serde_json::Value>;
