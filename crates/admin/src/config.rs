//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CRM_API_BASE_URL` - Base URL of the REST backend (default: `http://localhost:4000`)
//! - `CRM_PAGE_SIZE` - Default rows per page, one of 5, 10 or 25 (default: 10)
//! - `CRM_REQUEST_TIMEOUT_SECS` - HTTP timeout in seconds, 0 disables it (default: 30)
//! - `CRM_LEAD_CACHE_TTL_SECS` - How long lead names stay cached (default: 60)
//! - `CRM_PRINT_SPOOL_DIR` - Root directory of the file print bridge (default: `./print-spool`)
//! - `CRM_DEFAULT_PRINTER` - Print queue used when none is given

use std::path::PathBuf;
use std::time::Duration;

use crm_console_core::view::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LEAD_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_SPOOL_DIR: &str = "./print-spool";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL every resource path is joined onto
    pub api_base_url: Url,
    /// Rows per page until the user picks another size
    pub page_size: usize,
    /// Per-request timeout; `None` waits forever
    pub request_timeout: Option<Duration>,
    /// Lifetime of the cached lead-name lookup
    pub lead_cache_ttl: Duration,
    /// Root of the file print bridge
    pub print_spool_dir: PathBuf,
    /// Print queue used when none is given
    pub default_printer: Option<String>,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("CRM_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("CRM_API_BASE_URL".to_string(), e.to_string())
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "CRM_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let page_size = match get("CRM_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = parse_secs(
            get("CRM_REQUEST_TIMEOUT_SECS"),
            "CRM_REQUEST_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?;
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let ttl_secs = parse_secs(
            get("CRM_LEAD_CACHE_TTL_SECS"),
            "CRM_LEAD_CACHE_TTL_SECS",
            DEFAULT_LEAD_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            api_base_url,
            page_size,
            request_timeout,
            lead_cache_ttl: Duration::from_secs(ttl_secs),
            print_spool_dir: get("CRM_PRINT_SPOOL_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_SPOOL_DIR), PathBuf::from),
            default_printer: get("CRM_DEFAULT_PRINTER").map(|p| p.trim().to_string()),
        })
    }
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    let size = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar("CRM_PAGE_SIZE".to_string(), e.to_string()))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::InvalidEnvVar(
            "CRM_PAGE_SIZE".to_string(),
            format!("must be one of {PAGE_SIZE_OPTIONS:?} (got {size})"),
        ))
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    raw.map_or(Ok(default), |v| {
        v.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:4000/");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.lead_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.print_spool_dir, PathBuf::from("./print-spool"));
        assert_eq!(config.default_printer, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CRM_API_BASE_URL", "https://crm.internal/api/"),
            ("CRM_PAGE_SIZE", "25"),
            ("CRM_REQUEST_TIMEOUT_SECS", "0"),
            ("CRM_LEAD_CACHE_TTL_SECS", "5"),
            ("CRM_PRINT_SPOOL_DIR", "/var/spool/crm"),
            ("CRM_DEFAULT_PRINTER", " Front Desk "),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.host_str(), Some("crm.internal"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.lead_cache_ttl, Duration::from_secs(5));
        assert_eq!(config.print_spool_dir, PathBuf::from("/var/spool/crm"));
        assert_eq!(config.default_printer.as_deref(), Some("Front Desk"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("CRM_PAGE_SIZE", "  "), ("CRM_DEFAULT_PRINTER", "")]).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_printer, None);
    }

    #[test]
    fn test_page_size_must_be_an_option() {
        let err = load(&[("CRM_PAGE_SIZE", "7")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CRM_PAGE_SIZE"));

        let err = load(&[("CRM_PAGE_SIZE", "ten")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_url_and_timeout() {
        assert!(load(&[("CRM_API_BASE_URL", "not a url")]).is_err());
        assert!(load(&[("CRM_API_BASE_URL", "mailto:sales@example.com")]).is_err());
        assert!(load(&[("CRM_REQUEST_TIMEOUT_SECS", "-1")]).is_err());
    }
}
