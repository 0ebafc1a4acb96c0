use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::domain::csv::{ColumnSchema, Record};
use crate::domain::error::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message<'a> {
    Schema {
        stream: &'a str,
        schema: Value,
        key_properties: &'a [String],
    },
    Record {
        stream: &'a str,
        record: &'a Record,
    },
}

/// Newline-delimited JSON message writer
pub struct SingerWriter<W: Write> {
    out: W,
    records_written: u64,
}

impl<W: Write> SingerWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records_written: 0,
        }
    }

    pub fn write_schema(
        &mut self,
        stream: &str,
        schema: &ColumnSchema,
        key_properties: &[String],
    ) -> Result<()> {
        self.write_message(&Message::Schema {
            stream,
            schema: schema.to_json_schema(),
            key_properties,
        })
    }

    pub fn write_record(&mut self, stream: &str, record: &Record) -> Result<()> {
        self.write_message(&Message::Record { stream, record })?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_message(&mut self, message: &Message<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)
            .map_err(|e| AppError::IoError(format!("Failed to write message: {}", e)))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
