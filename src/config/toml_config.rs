use crate::core::repository::DEFAULT_SOURCE_URL;
use crate::core::session::DEFAULT_BASE_CURRENCY;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FxError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Settings file. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub export: ExportConfig,
    pub conversion: ConversionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Read the table from this file instead of `url`.
    pub file: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            file: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub base_currency: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FxError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FxError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FxError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::from_name(&self.logging.format).unwrap_or_default()
    }

    pub fn validate_config(&self) -> Result<()> {
        match &self.source.file {
            Some(file) => validation::validate_path("source.file", file)?,
            None => validation::validate_source_url("source.url", &self.source.url)?,
        }

        validation::validate_timeout_secs("source.timeout_seconds", self.source.timeout_seconds)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;
        validation::validate_non_empty_string("conversion.base_currency", &self.conversion.base_currency)?;

        if LogFormat::from_name(&self.logging.format).is_none() {
            return Err(FxError::InvalidConfigValue {
                field: "logging.format".to_string(),
                value: self.logging.format.clone(),
                reason: "Unsupported format. Valid formats: compact, json".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn source_file(&self) -> Option<&str> {
        self.source.file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn base_currency(&self) -> &str {
        &self.conversion.base_currency
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
