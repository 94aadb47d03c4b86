use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use serde::Deserialize;
use thiserror::Error;
use crate::upload::StatusTimings;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "HEALTHMATE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "healthmate.toml";

/// Upper bound for either status delay (one day).
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("processing_delay_ms ({processing}) must not exceed processed_delay_ms ({processed})")]
    InvalidDelays {
        processing: u64,
        processed: u64,
    },

    #[error("{field} must be greater than zero")]
    ZeroCapacity {
        field: &'static str,
    },

    #[error("{field} ({value}) exceeds the maximum of {max} ms")]
    DelayTooLong {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct UploadConfig {
    /// Uploading -> Processing, counted from submission
    pub processing_delay_ms: u64,
    /// Processing -> Processed, also counted from submission
    pub processed_delay_ms: u64,
    pub command_capacity: usize,
    /// 最大缓存事件数
    pub event_capacity: usize,
    pub seed_demo_documents: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 1000,
            processed_delay_ms: 3000,
            command_capacity: 100,
            event_capacity: 256,
            seed_demo_documents: false,
        }
    }
}

impl UploadConfig {
    pub fn timings(&self) -> StatusTimings {
        StatusTimings {
            processing_after: Duration::from_millis(self.processing_delay_ms),
            processed_after: Duration::from_millis(self.processed_delay_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, capacity) in [
            ("command_capacity", self.command_capacity),
            ("event_capacity", self.event_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity { field });
            }
        }

        for (field, value) in [
            ("processing_delay_ms", self.processing_delay_ms),
            ("processed_delay_ms", self.processed_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::DelayTooLong {
                    field,
                    value,
                    max: MAX_DELAY_MS,
                });
            }
        }

        if self.processing_delay_ms > self.processed_delay_ms {
            return Err(ConfigError::InvalidDelays {
                processing: self.processing_delay_ms,
                processed: self.processed_delay_ms,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.upload.validate()?;
        Ok(config)
    }

    /// A missing file is not an error; defaults apply.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn load_config() -> Result<Config, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }
}

/// Loads the process-wide config once. Later calls return the cached value.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}
