use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::csv::{FileConfig, TapOptions};
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "tap_csv.toml";
pub const CONFIG_PATH_ENV: &str = "TAP_CSV_CONFIG";
pub const ENV_PREFIX: &str = "TAP_CSV_";

/// Top-level tap configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    #[serde(default)]
    pub files: Vec<FileConfig>,

    #[serde(flatten)]
    pub options: TapOptions,
}

impl TapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(AppError::ConfigError(
                "at least one entry under `files` is required".to_string(),
            ));
        }
        for file in &self.files {
            file.validate().map_err(AppError::ConfigError)?;
        }
        Ok(())
    }
}

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Config path from `TAP_CSV_CONFIG`, else `tap_csv.toml`
    pub fn from_env() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// TOML file first, `TAP_CSV_*` environment variables on top
    pub fn figment(&self) -> Figment {
        Figment::new()
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    pub fn load(&self) -> Result<TapConfig> {
        let config: TapConfig = self.figment().extract()?;
        config.validate()?;
        Ok(config)
    }
}
