use crate::defaults;
use crate::error::{DgscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Keys accepted by [`Config::get_value`] and [`Config::set_value`].
pub const KEYS: &[&str] = &[
    "apikey",
    "transcription.model",
    "transcription.language",
    "transcription.endpoint",
    "transcription.timeout",
    "pipeline.workers",
    "pipeline.summary",
];

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub apikey: String,
    pub transcription: TranscriptionConfig,
    pub pipeline: PipelineConfig,
}

/// Remote transcription settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model: String,
    pub language: String,
    pub endpoint: String,
    /// Per-request timeout, humantime syntax ("90s", "10m").
    pub timeout: String,
}

/// Batch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub summary: PathBuf,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            timeout: defaults::DEFAULT_TIMEOUT.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: defaults::WORKERS,
            summary: PathBuf::from(defaults::SUMMARY_FILE),
        }
    }
}

impl TranscriptionConfig {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        parse_timeout(&self.timeout)
    }
}

fn parse_timeout(value: &str) -> Result<Duration> {
    humantime::parse_duration(value).map_err(|e| DgscribeError::ConfigInvalidValue {
        key: "transcription.timeout".to_string(),
        message: e.to_string(),
    })
}

fn parse_workers(value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DgscribeError::ConfigInvalidValue {
            key: "pipeline.workers".to_string(),
            message: format!("expected a positive integer, got {value:?}"),
        }),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(DgscribeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DGSCRIBE_APIKEY → apikey
    /// - DGSCRIBE_MODEL → transcription.model
    /// - DGSCRIBE_LANGUAGE → transcription.language
    /// - DGSCRIBE_WORKERS → pipeline.workers
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("DGSCRIBE_APIKEY")
            && !key.is_empty()
        {
            self.apikey = key;
        }

        if let Ok(model) = std::env::var("DGSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.transcription.model = model;
        }

        if let Ok(language) = std::env::var("DGSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.transcription.language = language;
        }

        if let Ok(workers) = std::env::var("DGSCRIBE_WORKERS")
            && !workers.is_empty()
        {
            match parse_workers(&workers) {
                Ok(n) => self.pipeline.workers = n,
                Err(e) => log::warn!("ignoring DGSCRIBE_WORKERS: {e}"),
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/dgscribe/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dgscribe").join("config.toml"))
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reads a dotted key.
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "apikey" => self.apikey.clone(),
            "transcription.model" => self.transcription.model.clone(),
            "transcription.language" => self.transcription.language.clone(),
            "transcription.endpoint" => self.transcription.endpoint.clone(),
            "transcription.timeout" => self.transcription.timeout.clone(),
            "pipeline.workers" => self.pipeline.workers.to_string(),
            "pipeline.summary" => self.pipeline.summary.display().to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Sets a dotted key, validating numeric and duration values.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "apikey" => self.apikey = value.to_string(),
            "transcription.model" => self.transcription.model = value.to_string(),
            "transcription.language" => self.transcription.language = value.to_string(),
            "transcription.endpoint" => self.transcription.endpoint = value.to_string(),
            "transcription.timeout" => {
                parse_timeout(value)?;
                self.transcription.timeout = value.to_string();
            }
            "pipeline.workers" => self.pipeline.workers = parse_workers(value)?,
            "pipeline.summary" => self.pipeline.summary = PathBuf::from(value),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// TOML rendering safe to print: the API key is masked.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if !shown.apikey.is_empty() {
            shown.apikey = "<redacted>".to_string();
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

fn unknown_key(key: &str) -> DgscribeError {
    DgscribeError::ConfigInvalidValue {
        key: key.to_string(),
        message: format!("unknown key (valid keys: {})", KEYS.join(", ")),
    }
}
