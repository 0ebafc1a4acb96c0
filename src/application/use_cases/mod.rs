pub mod csv_stream;
pub mod schema_inferencer;
pub mod type_coercer;
