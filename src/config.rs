//! Lookup endpoint configuration.
//!
//! Loaded from environment variables. `from_lookup` takes the variable
//! source as a function so tests do not touch the process environment.

use std::time::Duration;

use crate::consts::{DEFAULT_ACADEMIC_YEAR_PATH, DEFAULT_TIMEOUT_MS};

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where the lookup endpoint lives and how to authenticate to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Backend base URL without trailing slash (e.g. `https://erp.example.org/api`).
    pub base_url: String,
    /// Academic-year listing path, appended to `base_url`.
    pub path: String,
    pub api_key: String,
    pub app_version: String,
    pub timeout: Duration,
}

impl LookupConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            path: DEFAULT_ACADEMIC_YEAR_PATH.to_owned(),
            api_key: api_key.into(),
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `ERP_API_BASE_URL` -- backend base URL
    /// - `ERP_API_KEY` -- API key sent with every request
    ///
    /// Optional variables:
    /// - `ERP_APP_VERSION` -- application version header (default crate version)
    /// - `ERP_ACADEMIC_YEAR_PATH` -- listing path (default `/lookup/academic-years`)
    /// - `ERP_HTTP_TIMEOUT_MS` -- request timeout in milliseconds (default 10000)
    ///
    /// # Errors
    /// Returns `ConfigError` if a required variable is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LookupConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required variable is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url =
            var("ERP_API_BASE_URL").ok_or(ConfigError::Missing("ERP_API_BASE_URL"))?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "ERP_API_BASE_URL",
                reason: format!("expected an http(s) URL, found {base_url}"),
            });
        }
        let api_key = var("ERP_API_KEY").ok_or(ConfigError::Missing("ERP_API_KEY"))?;

        let mut config = Self::new(base_url, api_key);

        if let Some(version) = var("ERP_APP_VERSION") {
            config.app_version = version;
        }

        if let Some(path) = var("ERP_ACADEMIC_YEAR_PATH") {
            config.path = if path.starts_with('/') {
                path
            } else {
                format!("/{path}")
            };
        }

        if let Some(raw) = var("ERP_HTTP_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "ERP_HTTP_TIMEOUT_MS",
                reason: format!("{e}"),
            })?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Full URL of the academic-year listing
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}
