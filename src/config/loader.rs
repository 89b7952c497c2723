use super::{default_config_path, BotConfig};
use crate::error::{ErrorCode, OrderError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Resolves and reads the bot configuration
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    use_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            use_env: true,
        }
    }

    /// Read from this file instead of the platform default
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Skip environment overrides
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load the configuration
    ///
    /// An explicit path must exist. The platform default is optional and
    /// falls back to built-in defaults when absent.
    pub async fn load(&self) -> Result<BotConfig> {
        let mut config = match &self.explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(OrderError::config_with_code(
                        ErrorCode::CONFIG_NOT_FOUND,
                        format!("Configuration file not found: {}", path.display()),
                    ));
                }
                Self::read_file(path).await?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path).await?,
                None => {
                    debug!("No configuration file found, using defaults");
                    BotConfig::default()
                }
            },
        };

        if self.use_env {
            config.merge_env_vars();
        }

        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<BotConfig> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            OrderError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = BotConfig::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
