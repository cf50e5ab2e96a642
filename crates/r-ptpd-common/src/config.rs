//! ---
//! ptpd_section: "01-core-functionality"
//! ptpd_subsection: "module"
//! ptpd_type: "source"
//! ptpd_scope: "code"
//! ptpd_description: "Shared primitives and utilities for the core runtime."
//! ptpd_version: "v0.0.0-prealpha"
//! ptpd_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

/// Minimal alarm age, in update ticks, before a raised alarm may clear.
pub const DEFAULT_MIN_AGE_TO_CLEAR: u32 = 30;

fn default_update_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_min_age_to_clear() -> u32 {
    DEFAULT_MIN_AGE_TO_CLEAR
}

fn default_summary_capacity() -> usize {
    128
}

fn default_refresh_ticks() -> u64 {
    1
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9899))
}

/// Primary configuration object for the alarm daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub alarms: AlarmsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "R_PTPD_CONFIG";

    /// Load configuration from disk, respecting the `R_PTPD_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path.to_path_buf(),
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.alarms.validate()?;
        self.status.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Alarm engine tuning and per-alarm overrides.
///
/// `disabled` and `internal_only` hold alarm identifiers, either the short
/// code (`SYN`) or the full name (`NO_SYNC`); they are resolved by the
/// alarm registry.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmsConfig {
    #[serde(default = "default_update_interval")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub update_interval: Duration,
    #[serde(default = "default_min_age_to_clear")]
    pub min_age_to_clear: u32,
    #[serde(default)]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub initial_delay: Duration,
    #[serde(default = "default_summary_capacity")]
    pub summary_capacity: usize,
    #[serde(default)]
    pub disabled: Vec<String>,
    #[serde(default)]
    pub internal_only: Vec<String>,
}

impl Default for AlarmsConfig {
    fn default() -> Self {
        Self {
            update_interval: default_update_interval(),
            min_age_to_clear: default_min_age_to_clear(),
            initial_delay: Duration::ZERO,
            summary_capacity: default_summary_capacity(),
            disabled: Vec::new(),
            internal_only: Vec::new(),
        }
    }
}

impl AlarmsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.update_interval.is_zero() {
            return Err(anyhow!("alarms.update_interval must be greater than zero"));
        }
        if self.summary_capacity == 0 {
            return Err(anyhow!("alarms.summary_capacity must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_listen")]
    pub listen: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            listen: default_metrics_listen(),
        }
    }
}

/// Where and how often the daemon publishes alarm status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_refresh_ticks")]
    pub refresh_ticks: u64,
    /// Log the full alarm table every N ticks; 0 disables it.
    #[serde(default)]
    pub log_table_ticks: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            path: None,
            refresh_ticks: default_refresh_ticks(),
            log_table_ticks: 0,
        }
    }
}

impl StatusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.refresh_ticks == 0 {
            return Err(anyhow!("status.refresh_ticks must be greater than zero"));
        }
        Ok(())
    }
}
