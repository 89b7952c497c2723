//! Bot configuration
//!
//! Settings come from a TOML file and are then overridden by environment
//! variables, so a deployment can keep secrets such as the bearer token out
//! of the file.

use crate::error::{ErrorCode, OrderError, Result};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod loader;

pub use loader::ConfigLoader;

/// Default location of the image description helper
pub const DEFAULT_DESCRIBE_URL: &str = "http://127.0.0.1:5000/describe-image";

/// Get the platform config file path for grill-orders
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "grill-orders", "grill-orders")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub backend: BackendConfig,
    pub session: SessionSettings,
    pub delivery: DeliveryConfig,
    pub describe: DescribeConfig,
}

/// Endpoints of the catalog/order persistence service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub items_url: Option<String>,
    pub users_url: Option<String>,
    pub orders_url: Option<String>,
    pub summary_url: Option<String>,
    /// Never written back out when the settings are rendered
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
    /// Upper bound on a single catalog lookup before it counts as a miss
    #[serde(with = "humantime_serde")]
    pub lookup_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            items_url: None,
            users_url: None,
            orders_url: None,
            summary_url: None,
            bearer_token: None,
            lookup_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// Owner recorded on orders when the origin carries no user name
    pub default_owner: Option<String>,
    /// Offset used when stamping submitted orders
    pub timestamp_utc_offset_minutes: i32,
    /// chrono format string for the order start time
    pub timestamp_format: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_owner: None,
            timestamp_utc_offset_minutes: 120,
            timestamp_format: "%b %-d, %Y %I:%M %P".to_string(),
        }
    }
}

impl SessionSettings {
    pub fn timestamp_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.timestamp_utc_offset_minutes * 60).ok_or_else(|| {
            OrderError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!(
                    "timestamp_utc_offset_minutes out of range: {}",
                    self.timestamp_utc_offset_minutes
                ),
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeliveryConfig {
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DescribeConfig {
    pub url: String,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DESCRIBE_URL.to_string(),
        }
    }
}

impl BotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = &mut self.backend;
        for (key, slot) in [
            ("SERVER_ITEM", &mut backend.items_url),
            ("SERVER_USERS", &mut backend.users_url),
            ("SERVER_ORDER", &mut backend.orders_url),
            ("SERVER_TODAYS_ORDER", &mut backend.summary_url),
            ("BEARER_TOKEN", &mut backend.bearer_token),
            ("ORDER_OWNER", &mut self.session.default_owner),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }

        if let Some(url) = lookup("DESCRIBE_URL").filter(|v| !v.is_empty()) {
            self.describe.url = url;
        }
    }

    /// Check that everything needed to serve commands is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("backend.items_url", &self.backend.items_url),
            ("backend.users_url", &self.backend.users_url),
            ("backend.orders_url", &self.backend.orders_url),
            ("backend.summary_url", &self.backend.summary_url),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(OrderError::config_with_code(
                ErrorCode::CONFIG_MISSING_REQUIRED,
                format!("missing required settings: {}", missing.join(", ")),
            ));
        }

        if self.backend.lookup_timeout.is_zero() {
            return Err(OrderError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "backend.lookup_timeout must be greater than zero",
            ));
        }

        self.session.timestamp_offset()?;
        Ok(())
    }
}
