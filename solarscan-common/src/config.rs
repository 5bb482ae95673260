//! Configuration loading and resolution
//!
//! Resolution priority (highest first):
//! 1. Command-line arguments / environment variables (applied by the binary via [`ServiceConfig::apply_overrides`])
//! 2. TOML config file (explicit `--config` path, else `~/.config/solarscan/config.toml`)
//! 3. Compiled defaults
//!
//! A missing TOML file is not fatal: a warning is logged and defaults are used.
//! A TOML file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Service area marker accepted in geocoded region names
pub const DEFAULT_SERVICE_AREA_MARKERS: &[&str] = &["경기도", "Gyeonggi"];

/// Front-end origins allowed to call the API cross-origin
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://solarscan.kr",
    "https://www.solarscan.kr",
];

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub service_area: ServiceAreaConfig,
    pub pipeline: PipelineConfig,
    pub economics: EconomicsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Logging settings (overridden by `RUST_LOG` when set)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Cross-origin allow-list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Region markers identifying the supported service area
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAreaConfig {
    pub markers: Vec<String>,
}

impl Default for ServiceAreaConfig {
    fn default() -> Self {
        Self {
            markers: DEFAULT_SERVICE_AREA_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServiceAreaConfig {
    /// True when `region` names the supported service area
    ///
    /// Latin markers are compared case-insensitively.
    pub fn contains(&self, region: &str) -> bool {
        let region_lower = region.to_lowercase();
        self.markers
            .iter()
            .any(|marker| region_lower.contains(&marker.to_lowercase()))
    }
}

/// Behaviour of status lookups for identifiers the service never issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRequestPolicy {
    /// Respond 404
    #[default]
    NotFound,
    /// Respond with a fabricated "processing" placeholder (legacy front-end behaviour)
    ProcessingStub,
}

/// Background analysis pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of concurrent analysis workers
    pub worker_count: usize,
    /// Bounded job queue capacity; submissions beyond this are rejected
    pub queue_capacity: usize,
    /// Per-attempt timeout for one analysis run
    pub job_timeout_secs: u64,
    /// Total attempts per request (1 = no retry)
    pub max_attempts: u32,
    /// Duration hint returned to submitting clients
    pub estimated_time_seconds: u64,
    pub unknown_request_policy: UnknownRequestPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_capacity: 256,
            job_timeout_secs: 120,
            max_attempts: 1,
            estimated_time_seconds: 30,
            unknown_request_policy: UnknownRequestPolicy::NotFound,
        }
    }
}

/// One region-specific subsidy rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSubsidy {
    /// Substring matched against the geocoded region name
    pub region: String,
    /// Subsidy in won per installed kW
    pub per_kw: i64,
}

/// Economic model constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    pub installation_cost_per_kw: i64,
    pub default_subsidy_per_kw: i64,
    /// Won per kWh
    pub electricity_rate: i64,
    /// Checked in order; first match wins
    pub regional_subsidy: Vec<RegionalSubsidy>,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            installation_cost_per_kw: 5_000_000,
            default_subsidy_per_kw: 1_000_000,
            electricity_rate: 150,
            regional_subsidy: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or from the default location when `path` is `None`
    ///
    /// Falls back to compiled defaults when no file exists, and logs where the
    /// settings came from.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::resolve(path)?;
        source.log();
        Ok(config)
    }

    /// Same as [`ServiceConfig::load`] without logging
    ///
    /// For callers that install the tracing subscriber only once the
    /// configuration is known; they pass the returned source to
    /// [`ConfigSource::log`] afterwards.
    pub fn resolve(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let Some(config_path) = candidate else {
            return Ok((Self::default(), ConfigSource::NoConfigDir));
        };

        if !config_path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(config_path)));
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        Ok((config, ConfigSource::File(config_path)))
    }

    /// Apply command-line / environment overrides on top of file values
    pub fn apply_overrides(
        &mut self,
        bind_address: Option<String>,
        port: Option<u16>,
        log_level: Option<String>,
    ) {
        if let Some(bind_address) = bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.worker_count == 0 {
            return Err(Error::Config("pipeline.worker_count must be at least 1".to_string()));
        }
        if self.pipeline.queue_capacity == 0 {
            return Err(Error::Config("pipeline.queue_capacity must be at least 1".to_string()));
        }
        if self.pipeline.max_attempts == 0 {
            return Err(Error::Config("pipeline.max_attempts must be at least 1".to_string()));
        }
        if self.pipeline.job_timeout_secs == 0 {
            return Err(Error::Config("pipeline.job_timeout_secs must be at least 1".to_string()));
        }
        if self.service_area.markers.iter().all(|m| m.trim().is_empty()) {
            return Err(Error::Config("service_area.markers must not be empty".to_string()));
        }
        if self.economics.electricity_rate < 0 {
            return Err(Error::Config("economics.electricity_rate must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Where [`ServiceConfig::resolve`] found its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Path checked but absent; compiled defaults in use
    Missing(PathBuf),
    /// No platform config directory; compiled defaults in use
    NoConfigDir,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file not found: {}, using compiled defaults",
                path.display()
            ),
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using compiled defaults")
            }
        }
    }
}

/// Default configuration file path for the platform
///
/// `~/.config/solarscan/config.toml` on Linux; the platform config directory elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("solarscan").join("config.toml"))
}
