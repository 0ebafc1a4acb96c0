use std::io::Write;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::CsvStream;
use crate::domain::error::Result;
use crate::infrastructure::config::{ConfigService, TapConfig};
use crate::interfaces::singer::SingerWriter;

pub fn run() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config_service = ConfigService::from_env();
    let result = config_service.load().and_then(|config| {
        let stdout = std::io::stdout();
        sync(&config, stdout.lock())
    });

    match result {
        Ok(records) => {
            info!(records, "Sync complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(
                error = %err,
                structural = err.is_structural(),
                config = %config_service.path().display(),
                "Sync failed"
            );
            ExitCode::FAILURE
        }
    }
}

/// Emit a schema message and every record for each configured stream.
///
/// All streams resolve their files and schema before the first message is
/// written. Returns the number of records written.
pub fn sync<W: Write>(config: &TapConfig, out: W) -> Result<u64> {
    let streams = config
        .files
        .iter()
        .map(|file| CsvStream::new(file.clone(), &config.options))
        .collect::<Result<Vec<_>>>()?;
    for stream in &streams {
        stream.schema()?;
    }

    let mut writer = SingerWriter::new(out);
    for stream in &streams {
        writer.write_schema(stream.name(), stream.schema()?, stream.primary_keys())?;
        for record in stream.records(None)? {
            writer.write_record(stream.name(), &record?)?;
        }
        if stream.coercion_fallbacks() > 0 {
            info!(
                stream = %stream.name(),
                values = stream.coercion_fallbacks(),
                "Some values were kept as strings"
            );
        }
    }
    writer.flush()?;

    Ok(writer.records_written())
}
