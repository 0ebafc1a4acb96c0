use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    PathNotFound(String),
    NoEligibleFiles(String),
    MalformedRow(String),
    ConfigError(String),
    ParseError(String),
    IoError(String),
}

impl AppError {
    /// Whether this error stops the run before any record is produced.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AppError::PathNotFound(_) | AppError::NoEligibleFiles(_) | AppError::ConfigError(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PathNotFound(msg) => write!(f, "Path not found: {}", msg),
            AppError::NoEligibleFiles(msg) => write!(f, "No eligible files: {}", msg),
            AppError::MalformedRow(msg) => write!(f, "Malformed row: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
