//! Configuration loader for YAML files and environment resolution

use crate::config::types::*;
use crate::errors::MmdError;
use std::env;
use std::path::Path;
use tokio::fs;

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<MmdConfig, MmdError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            MmdError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML file, or fall back to the defaults when
    /// the file does not exist
    pub async fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<MmdConfig, MmdError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            log::info!("Loading configuration from file: {}", path.display());
            Self::from_file(path).await
        } else {
            log::info!(
                "Configuration file {} not found, using built-in defaults",
                path.display()
            );
            Self::defaults()
        }
    }

    /// Built-in defaults with environment resolution applied
    pub fn defaults() -> Result<MmdConfig, MmdError> {
        let mut config = MmdConfig::default();
        Self::resolve_environment(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<MmdConfig, MmdError> {
        let mut config: MmdConfig = if content.trim().is_empty() {
            MmdConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| MmdError::ConfigError(format!("Failed to parse YAML config: {}", e)))?
        };

        Self::resolve_environment(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Resolve API keys for every endpoint from their environment variables
    fn resolve_environment(config: &mut MmdConfig) {
        Self::resolve_auth(&mut config.inference.auth);
        Self::resolve_auth(&mut config.summarization.remote.auth);
        Self::resolve_auth(&mut config.evaluation.bertscore.auth);
    }

    fn resolve_auth(auth: &mut ApiAuth) {
        if let Some(env_var) = &auth.api_key_env {
            if let Ok(api_key) = env::var(env_var) {
                if !api_key.is_empty() {
                    auth.api_key = Some(api_key);
                }
            }
        }
    }
}
