use serde::Deserialize;
use anyhow::{Context, Result};
use std::env::VarError;
use std::path::Path;
use tokio::fs;

/// Env var naming an optional JSON config file.
pub const CONFIG_ENV: &str = "HEALTH_POLLER_CONFIG";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Only the logging setup is configurable; target and interval are fixed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl PollerConfig {
    /// Get the log level as a tracing::Level
    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow::anyhow!("Invalid log level: {}. Valid levels are: trace, debug, info, warn, error", self.log_level))
        }
    }

    /// Validate the log level is one of the supported values
    pub fn validate_log_level(&self) -> Result<()> {
        self.get_tracing_level().map(|_| ())
    }

    /// Reads the file named by `HEALTH_POLLER_CONFIG`, or falls back to defaults when unset.
    pub async fn from_env() -> Result<(Self, Option<String>)> {
        Self::from_var(std::env::var(CONFIG_ENV)).await
    }

    async fn from_var(var: Result<String, VarError>) -> Result<(Self, Option<String>)> {
        match var {
            Ok(path) => {
                let cfg = Self::load_file(&path).await?;
                Ok((cfg, Some(path)))
            }
            Err(VarError::NotPresent) => Ok((Self::default(), None)),
            Err(VarError::NotUnicode(raw)) => {
                Err(anyhow::anyhow!("{} is not valid unicode: {:?}", CONFIG_ENV, raw))
            }
        }
    }

    pub async fn load_file(file_path: &str) -> Result<Self> {
        if !Path::new(file_path).exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", file_path));
        }

        let content = fs::read_to_string(file_path).await?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", file_path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: PollerConfig = serde_json::from_str(content)?;
        config.validate_log_level()?;
        Ok(config)
    }
}
