//! Configuration schema types
//!
//! Every section has defaults, so an empty (or absent) file is a valid
//! configuration.

use crate::config::SecretString;
use crate::domain::{IpsError, ResourceCounts, Result};
use crate::locale::Locale;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main IPSGen configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpsGenConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Bundle generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Narrative enrichment service settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IpsGenConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.generation.validate()?;
        self.llm.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Bundle generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Locale code (`en_US`, `en_IE`)
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Seed for reproducible output; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Directory bundle files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Number of bundles per run
    #[serde(default = "default_bundles")]
    pub bundles: usize,

    /// Per-kind count overrides, e.g. `conditions = 4`
    #[serde(default)]
    pub counts: BTreeMap<String, i64>,

    /// RFC 3339 instant that dates are generated relative to; the current
    /// time when absent
    #[serde(default)]
    pub reference_time: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            seed: None,
            output_dir: default_output_dir(),
            pretty: true,
            bundles: default_bundles(),
            counts: BTreeMap::new(),
            reference_time: None,
        }
    }
}

impl GenerationConfig {
    /// Resolves the locale descriptor
    pub fn locale(&self) -> Result<&'static Locale> {
        Locale::from_code(&self.locale)
    }

    /// Default counts with this section's overrides applied
    pub fn resource_counts(&self) -> Result<ResourceCounts> {
        ResourceCounts::try_from(&self.counts)
    }

    /// Parses the pinned reference instant, if one is set
    pub fn reference_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.reference_time
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                DateTime::parse_from_rfc3339(value)
                    .map(|time| time.with_timezone(&Utc))
                    .map_err(|e| {
                        IpsError::Configuration(format!(
                            "generation.reference_time '{value}' is not an RFC 3339 timestamp: {e}"
                        ))
                    })
            })
            .transpose()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        self.locale().map_err(|e| e.to_string())?;
        self.resource_counts().map_err(|e| e.to_string())?;
        self.reference_time().map_err(|e| e.to_string())?;

        if self.bundles == 0 {
            return Err("generation.bundles must be > 0".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("generation.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Azure OpenAI narrative enrichment configuration
///
/// Enrichment needs `enabled` plus endpoint, api_key and deployment. Missing
/// values are not errors; enrichment is then silently disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Request narratives when generating
    #[serde(default)]
    pub enabled: bool,

    /// Service endpoint, e.g. `https://my-resource.openai.azure.com`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model deployment name
    #[serde(default)]
    pub deployment: Option<String>,

    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion length cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: default_api_version(),
            timeout_seconds: default_timeout_seconds(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Names of the required values that are missing or blank
    pub fn missing_values(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();
        let mut missing = Vec::new();
        if blank(&self.endpoint) {
            missing.push("endpoint");
        }
        if self
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().is_empty())
            .unwrap_or(true)
        {
            missing.push("api_key");
        }
        if blank(&self.deployment) {
            missing.push("deployment");
        }
        missing
    }

    /// Whether endpoint, credential and deployment are all present
    pub fn is_complete(&self) -> bool {
        self.missing_values().is_empty()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            if url::Url::parse(endpoint).is_err() {
                return Err(format!("llm.endpoint '{endpoint}' is not a valid URL"));
            }
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("llm.temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be > 0".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("llm.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bundles() -> usize {
    1
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    150
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
