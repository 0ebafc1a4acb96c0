// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// File discovery, dialect pre-processing, and row reading

mod dialect_filter;
mod file_locator;
mod row_reader;

pub use dialect_filter::DialectFilter;
pub use file_locator::{FileLocator, CSV_EXTENSION};
pub use row_reader::{CsvRows, RowReader};
