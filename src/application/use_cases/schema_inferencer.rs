// ============================================================
// SCHEMA INFERENCER USE CASE
// ============================================================
// Derive a column schema from the first file's header and type hints

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::warn;

use crate::domain::csv::{Column, ColumnSchema, TypeHints};
use crate::domain::error::Result;
use crate::infrastructure::csv::RowReader;

/// Header-driven schema inference
pub struct SchemaInferencer {
    hints: TypeHints,
    add_metadata_columns: bool,
}

impl SchemaInferencer {
    pub fn new(hints: TypeHints, add_metadata_columns: bool) -> Self {
        Self {
            hints,
            add_metadata_columns,
        }
    }

    /// Infer the schema from the header of the first file only.
    ///
    /// No files, or an empty first file, give a schema without data columns.
    pub fn infer(&self, files: &[PathBuf], reader: &RowReader) -> Result<ColumnSchema> {
        let header = match files.first() {
            Some(path) => reader.read_header(path)?.unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(self.from_header(&header))
    }

    /// Build the schema for a header row
    pub fn from_header(&self, header: &[String]) -> ColumnSchema {
        let mut taken: HashSet<String> = HashSet::new();
        if self.add_metadata_columns {
            taken.extend(ColumnSchema::metadata_columns().map(|c| c.name));
        }

        let columns = header
            .iter()
            .map(|name| {
                let column_type = self.hints.resolve(name);
                let unique = unique_name(name, &mut taken);
                if unique != *name {
                    warn!(column = %name, renamed = %unique, "Duplicate column name in header");
                }
                Column::new(unique, column_type)
            })
            .collect();

        ColumnSchema::new(columns, self.add_metadata_columns)
    }
}

/// Suffix `_2`, `_3`, ... until the name is free, then claim it
fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", name, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
