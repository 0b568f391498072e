//! Configuration for validation and maintenance runs.
//!
//! Settings come from three layers, applied in order: built-in defaults, an
//! optional YAML file, then `QBANK_*` environment variables. CLI flags are
//! applied last by the command layer through the `with_*` builders.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum trimmed prompt length before a "too short" warning.
pub const DEFAULT_MIN_PROMPT_LENGTH: usize = 10;

/// Default number of errors (and warnings) listed in the text report.
pub const DEFAULT_REPORT_LIMIT: usize = 20;

/// Markers identifying generated placeholder questions.
pub const DEFAULT_PLACEHOLDER_PATTERNS: &[&str] = &[
    "à compléter par le professeur",
    "à valider par le professeur",
    "TODO",
    "FIXME",
    "placeholder",
];

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Prompts shorter than this (after trimming) produce a warning.
    pub min_prompt_length: usize,
    /// Number of errors and warnings listed before summarizing the rest.
    pub report_limit: usize,
    /// Recognize hotspot, drag_drop and flashcard in addition to the core kinds.
    pub extended_types: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_prompt_length: DEFAULT_MIN_PROMPT_LENGTH,
            report_limit: DEFAULT_REPORT_LIMIT,
            extended_types: true,
        }
    }
}

/// Settings for the maintenance (cleaning) pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceSettings {
    /// Case-insensitive substrings marking a placeholder prompt.
    pub placeholder_patterns: Vec<String>,
    /// Remove `points` from flashcards while cleaning.
    pub strip_flashcard_points: bool,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            placeholder_patterns: DEFAULT_PLACEHOLDER_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            strip_flashcard_points: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub validation: ValidationSettings,
    pub maintenance: MaintenanceSettings,
}

impl BankConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolves the effective configuration: file (if any), then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QBANK_MIN_PROMPT_LENGTH`: Minimum prompt length (default: 10)
    /// - `QBANK_REPORT_LIMIT`: Findings listed per section (default: 20)
    /// - `QBANK_EXTENDED_TYPES`: Recognize extended kinds (default: true)
    /// - `QBANK_PLACEHOLDER_PATTERNS`: Comma-separated placeholder markers
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("QBANK_MIN_PROMPT_LENGTH") {
            self.validation.min_prompt_length =
                parse_env_value(&val, "QBANK_MIN_PROMPT_LENGTH")?;
        }

        if let Ok(val) = std::env::var("QBANK_REPORT_LIMIT") {
            self.validation.report_limit = parse_env_value(&val, "QBANK_REPORT_LIMIT")?;
        }

        if let Ok(val) = std::env::var("QBANK_EXTENDED_TYPES") {
            self.validation.extended_types = parse_env_bool(&val, "QBANK_EXTENDED_TYPES")?;
        }

        if let Ok(val) = std::env::var("QBANK_PLACEHOLDER_PATTERNS") {
            self.maintenance.placeholder_patterns = parse_pattern_list(&val);
        }

        Ok(self)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.report_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "report_limit must be greater than 0".to_string(),
            ));
        }

        if self
            .maintenance
            .placeholder_patterns
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(ConfigError::ValidationFailed(
                "placeholder_patterns cannot contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the minimum prompt length.
    pub fn with_min_prompt_length(mut self, length: usize) -> Self {
        self.validation.min_prompt_length = length;
        self
    }

    /// Builder method to set the report limit.
    pub fn with_report_limit(mut self, limit: usize) -> Self {
        self.validation.report_limit = limit;
        self
    }

    /// Builder method to toggle the extended question kinds.
    pub fn with_extended_types(mut self, enabled: bool) -> Self {
        self.validation.extended_types = enabled;
        self
    }

    /// Builder method to replace the placeholder markers.
    pub fn with_placeholder_patterns(mut self, patterns: Vec<String>) -> Self {
        self.maintenance.placeholder_patterns = patterns;
        self
    }

    /// Builder method to toggle flashcard point stripping.
    pub fn with_strip_flashcard_points(mut self, strip: bool) -> Self {
        self.maintenance.strip_flashcard_points = strip;
        self
    }
}

/// Parse an environment variable into a typed value.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}

/// Parse an environment variable as a boolean.
fn parse_env_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected boolean value, got '{}'", value),
        }),
    }
}

fn parse_pattern_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
