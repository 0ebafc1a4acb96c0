pub mod error;

// CSV streaming types
pub mod csv;
