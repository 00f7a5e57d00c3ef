use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::RefreshPolicy;

/// Environment variable prefix, e.g. `POWER_BILL__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "POWER_BILL";

/// Plain port variable set by container platforms; overrides `server.port`
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    PerRequest,
    Ttl,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    #[serde(default = "default_refresh_mode")]
    pub refresh: RefreshMode,
    /// Snapshot lifetime when `refresh = "ttl"`
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Reject calculations while the dataset cannot be loaded
    #[serde(default = "default_true")]
    pub require_on_calculate: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// `"*"` allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/tariffs.json")
}

fn default_refresh_mode() -> RefreshMode {
    RefreshMode::PerRequest
}

fn default_ttl_seconds() -> u64 {
    300
}

fn default_pid_file() -> PathBuf {
    PathBuf::from("power-bill.pid")
}

fn default_true() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            pid_file: default_pid_file(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            refresh: default_refresh_mode(),
            ttl_seconds: default_ttl_seconds(),
            require_on_calculate: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CatalogConfig {
    pub fn refresh_policy(&self) -> RefreshPolicy {
        match self.refresh {
            RefreshMode::PerRequest => RefreshPolicy::PerRequest,
            RefreshMode::Ttl => RefreshPolicy::Ttl(Duration::from_secs(self.ttl_seconds)),
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Load configuration from an optional TOML file overlaid with environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    load_config_with_port(path, std::env::var(PORT_ENV).ok().as_deref())
}

fn load_config_with_port(path: &Path, port: Option<&str>) -> anyhow::Result<Config> {
    let port = port
        .map(|raw| {
            raw.trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid {} '{}'", PORT_ENV, raw))
        })
        .transpose()?;

    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        )
        .set_override_option("server.port", port.map(i64::from))?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.host.trim().is_empty() {
        anyhow::bail!("server.host cannot be empty");
    }

    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be greater than 0");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid server.log_format '{}' (expected 'text' or 'json')", other),
    }

    if cfg.server.pid_file.as_os_str().is_empty() {
        anyhow::bail!("server.pid_file cannot be empty");
    }

    if cfg.catalog.path.as_os_str().is_empty() {
        anyhow::bail!("catalog.path cannot be empty");
    }

    if cfg.catalog.refresh == RefreshMode::Ttl && cfg.catalog.ttl_seconds == 0 {
        anyhow::bail!("catalog.ttl_seconds must be greater than 0 when refresh = \"ttl\"");
    }

    if cfg
        .cors
        .allowed_origins
        .iter()
        .any(|origin| origin.trim().is_empty())
    {
        anyhow::bail!("cors.allowed_origins cannot contain empty entries");
    }

    Ok(())
}
