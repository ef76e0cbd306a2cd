//! Configuration surface. An explicit record type populated at start-up and
//! validated eagerly, rather than a loosely-typed config object with dynamic
//! attribute access.

use crate::zone::ZoneName;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("malformed configuration value for {0}: {1}")]
    Malformed(&'static str, String),

    #[error("configuration validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub db_dsn: String,
    pub dnsbl_zones: Vec<ZoneName>,
    pub dns_timeout: Duration,
    pub dns_concurrency: usize,
    pub listed_priority: i64,
    pub clean_fallback_priority: i64,

    pub tracker_url: String,
    pub tracker_user: String,
    pub tracker_token: String,
    pub tracker_project: String,
    pub tracker_issue_type: String,
    pub tracker_dns_failure_type: String,
    pub tracker_excluded_statuses: Vec<String>,

    pub enable_supplemental_probe: bool,
    pub dry_run: bool,
    pub max_execution_time: Duration,
}

/// CLI flags that override the corresponding environment variable.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dry_run: Option<bool>,
    pub dns_timeout_secs: Option<u64>,
    pub dns_concurrency: Option<usize>,
    pub max_execution_time_secs: Option<u64>,
    pub enable_supplemental_probe: Option<bool>,
}

impl ReconcilerConfig {
    /// Loads every environment option, then applies CLI overrides, then
    /// validates. Fails fast on the first missing or malformed required
    /// value — configuration errors are always fatal at startup.
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = Self {
            db_dsn: required_env("DB_DSN")?,
            dnsbl_zones: parse_zone_list(&required_env("DNSBL_ZONES")?)?,
            dns_timeout: Duration::from_secs(parse_env_or("DNS_TIMEOUT", 5)?),
            dns_concurrency: parse_env_or("DNS_CONCURRENCY", 10)?,
            listed_priority: parse_env_or("LISTED_PRIORITY", 0)?,
            clean_fallback_priority: parse_env_or("CLEAN_FALLBACK_PRIORITY", 50)?,

            tracker_url: required_env("TRACKER_URL")?,
            tracker_user: required_env("TRACKER_USER")?,
            tracker_token: required_env("TRACKER_TOKEN")?,
            tracker_project: required_env("TRACKER_PROJECT")?,
            tracker_issue_type: required_env("TRACKER_ISSUE_TYPE")?,
            tracker_dns_failure_type: required_env("TRACKER_DNS_FAILURE_TYPE")?,
            tracker_excluded_statuses: std::env::var("TRACKER_EXCLUDED_STATUSES")
                .unwrap_or_else(|_| "closed,resolved,done".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            enable_supplemental_probe: parse_env_or("ENABLE_SUPPLEMENTAL_PROBE", true)?,
            dry_run: parse_env_or("DRY_RUN", false)?,
            max_execution_time: Duration::from_secs(parse_env_or("MAX_EXECUTION_TIME", 300)?),
        };

        config.apply_cli_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(secs) = overrides.dns_timeout_secs {
            self.dns_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = overrides.dns_concurrency {
            self.dns_concurrency = n;
        }
        if let Some(secs) = overrides.max_execution_time_secs {
            self.max_execution_time = Duration::from_secs(secs);
        }
        if let Some(enabled) = overrides.enable_supplemental_probe {
            self.enable_supplemental_probe = enabled;
        }
    }

    /// Zero configured zones is rejected at config validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dnsbl_zones.is_empty() {
            return Err(ConfigError::Validation(
                "DNSBL_ZONES must list at least one zone".to_string(),
            ));
        }
        if self.dns_concurrency == 0 {
            return Err(ConfigError::Validation(
                "DNS_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.db_dsn.is_empty() {
            return Err(ConfigError::Validation("DB_DSN must not be empty".to_string()));
        }
        Ok(())
    }
}

fn required_env(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .map_err(|_| ConfigError::Missing(key))
        .and_then(|v| {
            if v.is_empty() {
                Err(ConfigError::Missing(key))
            } else {
                Ok(v)
            }
        })
}

fn parse_env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Malformed(key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_zone_list(raw: &str) -> Result<Vec<ZoneName>, ConfigError> {
    let zones: Vec<ZoneName> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ZoneName::new)
        .collect();
    if zones.is_empty() {
        return Err(ConfigError::Validation(
            "DNSBL_ZONES must list at least one zone".to_string(),
        ));
    }
    Ok(zones)
}
