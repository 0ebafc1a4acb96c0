// ============================================================
// CSV STREAM USE CASE
// ============================================================
// Orchestrate file discovery, schema inference, and typed row streaming

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::unsync::OnceCell;
use tracing::{debug, info};

use super::schema_inferencer::SchemaInferencer;
use super::type_coercer::TypeCoercer;
use crate::domain::csv::{ColumnSchema, FileConfig, Record, StreamContext, TapOptions};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{CsvRows, FileLocator, RowReader};

/// One configured CSV stream.
///
/// The file list and the schema are both computed on first use and then
/// frozen for the lifetime of the stream.
pub struct CsvStream {
    file_config: FileConfig,
    locator: FileLocator,
    reader: RowReader,
    inferencer: SchemaInferencer,
    coercer: TypeCoercer,
    schema: OnceCell<ColumnSchema>,
}

impl CsvStream {
    /// Create a stream; fails on an invalid dialect or unknown encoding
    pub fn new(file_config: FileConfig, options: &TapOptions) -> Result<Self> {
        file_config.validate().map_err(AppError::ConfigError)?;

        let reader = RowReader::new(file_config.dialect.clone(), file_config.encoding.as_deref())?;
        let inferencer = SchemaInferencer::new(options.type_hints(), options.add_metadata_columns);

        Ok(Self {
            locator: FileLocator::new(&file_config.path),
            file_config,
            reader,
            inferencer,
            coercer: TypeCoercer::new(),
            schema: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.file_config.entity
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.file_config.keys
    }

    /// Eligible files, resolved once
    pub fn file_paths(&self) -> Result<&[PathBuf]> {
        self.locator.resolve().map_err(|e| match e {
            AppError::NoEligibleFiles(msg) => {
                AppError::NoEligibleFiles(format!("Stream '{}': {}", self.name(), msg))
            }
            other => other,
        })
    }

    /// Column schema, inferred from the first file on first access
    pub fn schema(&self) -> Result<&ColumnSchema> {
        self.schema.get_or_try_init(|| {
            let files = self.file_paths()?;
            let schema = self.inferencer.infer(files, &self.reader)?;
            info!(
                stream = %self.name(),
                columns = schema.len(),
                "Inferred schema from {}",
                files[0].display()
            );
            Ok(schema)
        })
    }

    /// Typed records across every resolved file, in file order.
    ///
    /// Files and schema are resolved before the iterator is returned, so
    /// configuration problems surface here rather than mid-stream. The
    /// partition `context` is accepted for pipeline compatibility and ignored.
    pub fn records(&self, _context: Option<&StreamContext>) -> Result<Records<'_>> {
        let files = self.file_paths()?;
        let schema = self.schema()?;

        Ok(Records {
            stream: self,
            schema,
            files: files.iter(),
            state: FileState::NotStarted,
        })
    }

    pub fn coercion_fallbacks(&self) -> u64 {
        self.coercer.fallback_count()
    }
}

/// An open file and the provenance captured before its first row
struct OpenFile<'a> {
    path: &'a Path,
    mtime: DateTime<Utc>,
    rows: CsvRows,
}

enum FileState<'a> {
    NotStarted,
    ReadingHeader(OpenFile<'a>),
    StreamingRows { file: OpenFile<'a>, lineno: u64 },
    Done,
}

/// Pull-based record iterator. At most one file is open at a time; it is
/// closed when its rows run out, when an error ends the run, or when the
/// iterator is dropped.
pub struct Records<'a> {
    stream: &'a CsvStream,
    schema: &'a ColumnSchema,
    files: std::slice::Iter<'a, PathBuf>,
    state: FileState<'a>,
}

impl<'a> Records<'a> {
    fn open_next(&mut self) -> Result<Option<OpenFile<'a>>> {
        let Some(path) = self.files.next() else {
            return Ok(None);
        };

        let mtime = fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .map_err(|e| {
                AppError::IoError(format!("Failed to stat {}: {}", path.display(), e))
            })?;
        let rows = self.stream.reader.read_rows(path)?;

        info!(stream = %self.stream.name(), path = %path.display(), "Streaming file");
        Ok(Some(OpenFile { path, mtime, rows }))
    }

    fn build_record(&self, file: &OpenFile<'_>, lineno: u64, raw: Vec<String>) -> Record {
        let data_width = self.schema.data_columns().len();
        if raw.len() != data_width {
            debug!(
                path = %file.path.display(),
                lineno,
                fields = raw.len(),
                columns = data_width,
                "Row width differs from header"
            );
        }

        let mut fields = Vec::with_capacity(raw.len() + 3);
        if self.schema.has_metadata() {
            fields.push(file.path.display().to_string());
            fields.push(file.mtime.to_rfc3339());
            fields.push(lineno.to_string());
        }
        fields.extend(raw);

        self.schema
            .columns()
            .iter()
            .zip(fields)
            .map(|(column, value)| {
                let typed = self
                    .stream
                    .coercer
                    .apply(&column.name, &value, column.column_type);
                (column.name.clone(), typed)
            })
            .collect()
    }

    fn fail(&mut self, err: AppError) -> Option<Result<Record>> {
        self.state = FileState::Done;
        Some(Err(err))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, FileState::Done) {
                FileState::Done => return None,
                FileState::NotStarted => match self.open_next() {
                    Ok(Some(file)) => self.state = FileState::ReadingHeader(file),
                    Ok(None) => return None,
                    Err(e) => return self.fail(e),
                },
                FileState::ReadingHeader(mut file) => match file.rows.next() {
                    Some(Ok(_header)) => {
                        self.state = FileState::StreamingRows { file, lineno: 0 }
                    }
                    Some(Err(e)) => return self.fail(e),
                    None => self.state = FileState::NotStarted,
                },
                FileState::StreamingRows { mut file, lineno } => match file.rows.next() {
                    Some(Ok(raw)) => {
                        let record = self.build_record(&file, lineno, raw);
                        self.state = FileState::StreamingRows {
                            file,
                            lineno: lineno + 1,
                        };
                        return Some(Ok(record));
                    }
                    Some(Err(e)) => return self.fail(e),
                    None => {
                        info!(path = %file.path.display(), rows = lineno, "Finished file");
                        self.state = FileState::NotStarted;
                    }
                },
            }
        }
    }
}
