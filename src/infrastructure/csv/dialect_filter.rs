// ============================================================
// DIALECT FILTER
// ============================================================
// Byte pre-pass between the decoder and the csv parser. Tracks quoting
// the same way the parser does so it can drop spaces at the start of a
// field and reject stray or unterminated quotes in strict mode.

use std::io::{self, Read};

use crate::domain::csv::Dialect;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartRecord,
    StartField,
    InField,
    InQuotedField,
    EscapeInQuotedField,
    QuoteInQuotedField,
}

/// `io::Read` adapter applying `skipinitialspace` and `strict` quoting rules.
///
/// Quote violations surface as `io::ErrorKind::InvalidData`, after every
/// byte preceding the offending one has been handed to the caller.
pub struct DialectFilter<R> {
    inner: R,
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    doublequote: bool,
    skip_initial_space: bool,
    strict: bool,
    state: State,
    line: u64,
    chunk: Box<[u8]>,
    pending: Option<io::Error>,
    finished: bool,
}

impl<R: Read> DialectFilter<R> {
    pub fn new(inner: R, dialect: &Dialect) -> Self {
        Self {
            inner,
            delimiter: dialect.delimiter_byte(),
            quote: dialect.quote_byte(),
            escape: dialect.escape_byte(),
            doublequote: dialect.doublequote,
            skip_initial_space: dialect.skipinitialspace,
            strict: dialect.strict,
            state: State::StartRecord,
            line: 1,
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            pending: None,
            finished: false,
        }
    }

    /// Advance the state machine by one byte; `Ok(false)` drops the byte
    fn step(&mut self, byte: u8) -> io::Result<bool> {
        let newline = byte == b'\n' || byte == b'\r';
        if byte == b'\n' {
            self.line += 1;
        }

        match self.state {
            State::StartRecord | State::StartField => {
                if newline {
                    self.state = State::StartRecord;
                } else if byte == b' ' && self.skip_initial_space {
                    return Ok(false);
                } else if byte == self.quote {
                    self.state = State::InQuotedField;
                } else if byte == self.delimiter {
                    self.state = State::StartField;
                } else {
                    self.state = State::InField;
                }
            }
            State::InField => {
                if newline {
                    self.state = State::StartRecord;
                } else if byte == self.delimiter {
                    self.state = State::StartField;
                }
            }
            State::InQuotedField => {
                if byte == self.quote {
                    self.state = State::QuoteInQuotedField;
                } else if Some(byte) == self.escape {
                    self.state = State::EscapeInQuotedField;
                }
            }
            State::EscapeInQuotedField => self.state = State::InQuotedField,
            State::QuoteInQuotedField => {
                if byte == self.quote && self.doublequote {
                    self.state = State::InQuotedField;
                } else if byte == self.delimiter {
                    self.state = State::StartField;
                } else if newline {
                    self.state = State::StartRecord;
                } else if self.strict && self.doublequote {
                    return Err(self.malformed(format!(
                        "'{}' expected after '{}'",
                        self.delimiter as char, self.quote as char
                    )));
                } else {
                    self.state = State::InField;
                }
            }
        }
        Ok(true)
    }

    fn finish(&mut self) -> io::Result<()> {
        let open_quote = matches!(
            self.state,
            State::InQuotedField | State::EscapeInQuotedField
        );
        if self.strict && open_quote {
            return Err(self.malformed("unexpected end of data".to_string()));
        }
        Ok(())
    }

    fn malformed(&self, message: String) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line {}: {}", self.line, message),
        )
    }
}

impl<R: Read> Read for DialectFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        loop {
            let want = buf.len().min(self.chunk.len());
            let n = self.inner.read(&mut self.chunk[..want])?;
            if n == 0 {
                self.finished = true;
                self.finish()?;
                return Ok(0);
            }

            let mut written = 0;
            for i in 0..n {
                let byte = self.chunk[i];
                match self.step(byte) {
                    Ok(true) => {
                        buf[written] = byte;
                        written += 1;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        self.finished = true;
                        if written == 0 {
                            return Err(err);
                        }
                        self.pending = Some(err);
                        return Ok(written);
                    }
                }
            }

            // a chunk made only of skipped spaces yields nothing; keep reading
            if written > 0 {
                return Ok(written);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_all(input: &[u8], dialect: Dialect) -> io::Result<String> {
        let mut filter = DialectFilter::new(input, &dialect);
        let mut out = String::new();
        filter.read_to_string(&mut out)?;
        Ok(out)
    }

    fn skipping() -> Dialect {
        Dialect {
            skipinitialspace: true,
            ..Dialect::default()
        }
    }

    fn strict() -> Dialect {
        Dialect {
            strict: true,
            ..Dialect::default()
        }
    }

    #[test]
    fn test_spaces_after_delimiter_are_dropped() {
        let out = filter_all(b"a, b\n1,  \"x, y\",z\n", skipping()).unwrap();
        assert_eq!(out, "a,b\n1,\"x, y\",z\n");
    }

    #[test]
    fn test_spaces_inside_quotes_are_kept() {
        let out = filter_all(b"a,b\n1,\"  padded\"\n", skipping()).unwrap();
        assert_eq!(out, "a,b\n1,\"  padded\"\n");
    }

    #[test]
    fn test_trailing_spaces_are_kept() {
        let out = filter_all(b"a ,b \n", skipping()).unwrap();
        assert_eq!(out, "a ,b \n");
    }

    #[test]
    fn test_default_dialect_passes_through() {
        let input = b"a, b\n\"x\"y,\"open\n";
        assert_eq!(filter_all(input, Dialect::default()).unwrap().as_bytes(), input);
    }

    #[test]
    fn test_strict_rejects_text_after_closing_quote() {
        let err = filter_all(b"a,b\n\"x\"y,2\n", strict()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_strict_accepts_doubled_quotes() {
        let input = b"a,b\n\"say \"\"hi\"\"\",2\n";
        assert_eq!(filter_all(input, strict()).unwrap().as_bytes(), input);
    }

    #[test]
    fn test_strict_rejects_unterminated_quote() {
        let err = filter_all(b"a,b\n1,\"never closed\n", strict()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_bytes_before_a_violation_are_delivered() {
        let mut filter = DialectFilter::new(&b"a,b\n\"x\"y\n"[..], &strict());
        let mut buf = [0u8; 64];

        let n = filter.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"a,b\n\"x\"");
        assert!(filter.read(&mut buf).is_err());
        assert_eq!(filter.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_small_output_buffer() {
        let mut filter = DialectFilter::new(&b"a,    b"[..], &skipping());
        let mut out = Vec::new();
        let mut buf = [0u8; 1];
        loop {
            let n = filter.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"a,b");
    }
}
