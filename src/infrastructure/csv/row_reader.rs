// ============================================================
// ROW READER
// ============================================================
// Open one CSV file with a configured dialect and stream raw rows

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use super::DialectFilter;
use crate::domain::csv::Dialect;
use crate::domain::error::{AppError, Result};

type Source = DialectFilter<DecodeReaderBytes<File, Vec<u8>>>;

/// Dialect-aware CSV reader
#[derive(Debug, Clone)]
pub struct RowReader {
    dialect: Dialect,
    encoding: &'static Encoding,
}

impl RowReader {
    /// Create a reader; `encoding` is a WHATWG label such as `"latin1"`
    pub fn new(dialect: Dialect, encoding: Option<&str>) -> Result<Self> {
        dialect.validate().map_err(AppError::ConfigError)?;

        let encoding = match encoding {
            Some(label) => Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                AppError::ConfigError(format!("Unknown text encoding: {}", label))
            })?,
            None => UTF_8,
        };

        Ok(Self { dialect, encoding })
    }

    /// Open a file and return its rows, header first.
    ///
    /// The file handle lives inside the returned iterator and is closed when
    /// it is exhausted or dropped. Rows may differ in width; blank lines are
    /// skipped by the parser.
    pub fn read_rows(&self, path: &Path) -> Result<CsvRows> {
        let file = File::open(path)
            .map_err(|e| AppError::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
        let decoded = DecodeReaderBytesBuilder::new()
            .encoding(Some(self.encoding))
            .build(file);
        let source = DialectFilter::new(decoded, &self.dialect);

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.dialect.delimiter_byte())
            .quote(self.dialect.quote_byte())
            .double_quote(self.dialect.doublequote)
            .flexible(true);
        if let Some(escape) = self.dialect.escape_byte() {
            builder.escape(Some(escape));
        }

        Ok(CsvRows {
            records: builder.from_reader(source).into_records(),
            path: path.to_path_buf(),
            done: false,
        })
    }

    /// Read only the first row of a file. `None` for an empty file.
    pub fn read_header(&self, path: &Path) -> Result<Option<Vec<String>>> {
        self.read_rows(path)?.next().transpose()
    }
}

/// Lazy, single-pass row sequence over one open file
pub struct CsvRows {
    records: StringRecordsIntoIter<Source>,
    path: PathBuf,
    done: bool,
}

impl Iterator for CsvRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.records.next() {
            Some(Ok(record)) => Some(Ok(record.iter().map(str::to_string).collect())),
            Some(Err(err)) => {
                self.done = true;
                Some(Err(read_error(&self.path, err)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

fn read_error(path: &Path, err: csv::Error) -> AppError {
    let message = format!("{} ({})", err, path.display());
    match err.kind() {
        csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
            AppError::MalformedRow(message)
        }
        csv::ErrorKind::Io(_) => AppError::IoError(message),
        _ => AppError::ParseError(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    fn read_all(reader: &RowReader, file: &NamedTempFile) -> Result<Vec<Vec<String>>> {
        reader.read_rows(file.path())?.collect()
    }

    #[test]
    fn test_header_is_first_row() {
        let file = csv_file(b"a,b\n1,2\n3,4\n");
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[2], vec!["3", "4"]);
        assert_eq!(reader.read_header(file.path()).unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_custom_dialect() {
        let file = csv_file(b"name|note\n'x|y'|'it''s'\n");
        let dialect = Dialect {
            delimiter: '|',
            quotechar: '\'',
            ..Dialect::default()
        };
        let reader = RowReader::new(dialect, None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows[1], vec!["x|y", "it's"]);
    }

    #[test]
    fn test_escape_char() {
        let file = csv_file(b"a,b\n\"say \\\"hi\\\"\",2\n");
        let dialect = Dialect {
            escapechar: Some('\\'),
            doublequote: false,
            ..Dialect::default()
        };
        let reader = RowReader::new(dialect, None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows[1], vec!["say \"hi\"", "2"]);
    }

    fn strict_reader() -> RowReader {
        RowReader::new(
            Dialect {
                strict: true,
                ..Dialect::default()
            },
            None,
        )
        .unwrap()
    }

    fn skipping_reader() -> RowReader {
        RowReader::new(
            Dialect {
                skipinitialspace: true,
                ..Dialect::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_skip_initial_space() {
        let file = csv_file(b"a, b\n1,  2\n");
        let rows = read_all(&skipping_reader(), &file).unwrap();

        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_skip_initial_space_before_quoted_field() {
        let file = csv_file(b"a,b,c\n1, \"x, y\",z\n");
        let rows = read_all(&skipping_reader(), &file).unwrap();

        assert_eq!(rows[1], vec!["1", "x, y", "z"]);
    }

    #[test]
    fn test_skip_initial_space_keeps_quoted_padding() {
        let file = csv_file(b"a,b\n1,\"  padded\"\n");
        let rows = read_all(&skipping_reader(), &file).unwrap();

        assert_eq!(rows[1], vec!["1", "  padded"]);
    }

    #[test]
    fn test_strict_accepts_ragged_rows() {
        let file = csv_file(b"a,b\n1\n1,2,3\n");
        let rows = read_all(&strict_reader(), &file).unwrap();

        assert_eq!(rows[1], vec!["1"]);
        assert_eq!(rows[2], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_strict_rejects_stray_quote() {
        let file = csv_file(b"a,b\n\"x\"y,2\n");
        let err = read_all(&strict_reader(), &file).unwrap_err();
        assert!(matches!(err, AppError::MalformedRow(_)));

        let lenient = RowReader::new(Dialect::default(), None).unwrap();
        let rows = read_all(&lenient, &file).unwrap();
        assert_eq!(rows[1], vec!["xy", "2"]);
    }

    #[test]
    fn test_strict_rejects_unterminated_quote() {
        let file = csv_file(b"a,b\n1,\"open\n");
        let err = read_all(&strict_reader(), &file).unwrap_err();
        assert!(matches!(err, AppError::MalformedRow(_)));
    }

    #[test]
    fn test_error_ends_sequence() {
        let file = csv_file(b"a,b\n1,2\n\"x\"y,3\n4,5\n");
        let mut rows = strict_reader().read_rows(file.path()).unwrap();

        assert_eq!(rows.next().unwrap().unwrap(), vec!["a", "b"]);
        assert_eq!(rows.next().unwrap().unwrap(), vec!["1", "2"]);
        assert!(matches!(rows.next(), Some(Err(AppError::MalformedRow(_)))));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let file = csv_file(b"a\n1\n\n2\n");
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows, vec![vec!["a"], vec!["1"], vec!["2"]]);
    }

    #[test]
    fn test_configured_encoding() {
        let file = csv_file(b"city\nM\xfcnchen\n");
        let reader = RowReader::new(Dialect::default(), Some("latin1")).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows[1], vec!["München"]);
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let file = csv_file(b"\xef\xbb\xbfa,b\n1,2\n");
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows[0], vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let file = csv_file(b"a\nx\xffy\n");
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        let rows = read_all(&reader, &file).unwrap();

        assert_eq!(rows[1], vec!["x\u{FFFD}y"]);
    }

    #[test]
    fn test_large_file_with_skipped_spaces() {
        let mut content = String::from("a, b, c\n");
        content.push_str(&"1,  \"x, y\",   z\n".repeat(5_000));
        let file = csv_file(content.as_bytes());
        let rows = read_all(&skipping_reader(), &file).unwrap();

        assert_eq!(rows.len(), 5_001);
        assert!(rows[1..].iter().all(|row| row == &["1", "x, y", "z"]));
    }

    #[test]
    fn test_unknown_encoding_is_config_error() {
        let err = RowReader::new(Dialect::default(), Some("klingon-8")).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        let err = reader
            .read_rows(Path::new("/definitely/not/here.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, AppError::IoError(_)));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let file = csv_file(b"");
        let reader = RowReader::new(Dialect::default(), None).unwrap();
        assert!(reader.read_header(file.path()).unwrap().is_none());
    }
}
