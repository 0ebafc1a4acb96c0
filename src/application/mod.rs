pub mod use_cases;

pub use use_cases::csv_stream::{CsvStream, Records};
pub use use_cases::schema_inferencer::SchemaInferencer;
pub use use_cases::type_coercer::TypeCoercer;
