// ============================================================
// FILE CONFIGURATION
// ============================================================
// Per-stream source path, primary keys, and CSV dialect

use serde::{Deserialize, Serialize};

/// CSV syntactic conventions used to split a file into rows and fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    /// Field separator (default: comma)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Quote character (default: double quote)
    #[serde(default = "default_quotechar")]
    pub quotechar: char,

    /// Escape character inside quoted fields (default: none)
    #[serde(default)]
    pub escapechar: Option<char>,

    /// Whether a doubled quote inside a quoted field means a literal quote
    #[serde(default = "default_true")]
    pub doublequote: bool,

    /// Strip whitespace immediately following a delimiter
    #[serde(default)]
    pub skipinitialspace: bool,

    /// Fail the read on rows whose width differs from the header
    #[serde(default)]
    pub strict: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_quotechar() -> char {
    '"'
}

fn default_true() -> bool {
    true
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            quotechar: default_quotechar(),
            escapechar: None,
            doublequote: true,
            skipinitialspace: false,
            strict: false,
        }
    }
}

impl Dialect {
    /// Validate dialect characters.
    ///
    /// The CSV reader works on bytes, so every configured character must be ASCII.
    pub fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() {
            return Err(format!("delimiter must be ASCII, got {:?}", self.delimiter));
        }
        if !self.quotechar.is_ascii() {
            return Err(format!("quotechar must be ASCII, got {:?}", self.quotechar));
        }
        if let Some(escape) = self.escapechar {
            if !escape.is_ascii() {
                return Err(format!("escapechar must be ASCII, got {:?}", escape));
            }
        }
        if self.delimiter == self.quotechar {
            return Err("delimiter and quotechar must differ".to_string());
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    pub fn quote_byte(&self) -> u8 {
        self.quotechar as u8
    }

    pub fn escape_byte(&self) -> Option<u8> {
        self.escapechar.map(|c| c as u8)
    }
}

/// Configuration of one CSV stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Stream name
    pub entity: String,

    /// File or directory to read
    pub path: String,

    /// Primary key columns
    #[serde(default)]
    pub keys: Vec<String>,

    /// Text encoding label (default: UTF-8)
    #[serde(default)]
    pub encoding: Option<String>,

    #[serde(flatten)]
    pub dialect: Dialect,
}

impl FileConfig {
    /// Create a config with the default dialect
    pub fn new(entity: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            path: path.into(),
            keys: Vec::new(),
            encoding: None,
            dialect: Dialect::default(),
        }
    }

    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.entity.trim().is_empty() {
            return Err("entity must not be empty".to_string());
        }
        if self.path.trim().is_empty() {
            return Err(format!("stream '{}': path must not be empty", self.entity));
        }
        self.dialect
            .validate()
            .map_err(|e| format!("stream '{}': {}", self.entity, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: FileConfig =
            serde_json::from_str(r#"{"entity": "users", "path": "data/users.csv"}"#).unwrap();

        assert_eq!(config.dialect, Dialect::default());
        assert!(config.keys.is_empty());
        assert!(config.encoding.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flattened_dialect_fields() {
        let config: FileConfig = serde_json::from_str(
            r#"{"entity": "t", "path": "x.csv", "delimiter": ";", "escapechar": "\\", "strict": true}"#,
        )
        .unwrap();

        assert_eq!(config.dialect.delimiter_byte(), b';');
        assert_eq!(config.dialect.escape_byte(), Some(b'\\'));
        assert!(config.dialect.strict);
        assert!(config.dialect.doublequote);
    }

    #[test]
    fn test_rejects_non_ascii_and_clashing_chars() {
        let mut dialect = Dialect::default();
        dialect.delimiter = '§';
        assert!(dialect.validate().is_err());

        let mut dialect = Dialect::default();
        dialect.quotechar = ',';
        assert!(dialect.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_path() {
        let config = FileConfig::new("users", "  ");
        assert!(config.validate().is_err());
    }
}
