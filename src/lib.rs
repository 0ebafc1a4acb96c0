pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::{run, sync};
pub use application::CsvStream;
pub use domain::csv::{
    Column, ColumnSchema, ColumnType, FieldValue, FileConfig, Record, TapOptions,
};
pub use domain::error::{AppError, Result};
pub use infrastructure::config::{ConfigService, TapConfig};
