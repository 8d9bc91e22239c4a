//! Configuration loader
//!
//! Loads engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the database path is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `SITELEDGER_DB_PATH`: Database file path (required)
//! - `SITELEDGER_DB_POOL_SIZE`: Connection pool size (default 4)
//! - `SITELEDGER_STANDARD_DAY_HOURS`: Hours in a standard working day
//!   (default 8)
//! - `SITELEDGER_MONEY_SCALE`: Decimal places kept for rounded money
//!   (default 2)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./siteledger.{json,toml}`
//! 2. The same names one and two directories up
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use siteledger_domain::constants::{
    DEFAULT_DB_POOL_SIZE, DEFAULT_MONEY_SCALE, DEFAULT_STANDARD_DAY_HOURS,
};
use siteledger_domain::{
    BillingConfig, Config, DatabaseConfig, PayrollConfig, Result, SiteLedgerError,
};

const DB_PATH_VAR: &str = "SITELEDGER_DB_PATH";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "siteledger.json", "siteledger.toml"];

/// Load configuration with automatic fallback strategy
///
/// Environment variables win whenever `SITELEDGER_DB_PATH` is set; a config
/// file is only consulted when it is not. A set but invalid variable is
/// reported as is, never masked by a file.
///
/// # Errors
/// Returns `SiteLedgerError::Config` if an environment value is invalid,
/// if no config file is found when the path variable is unset, or if the
/// loaded configuration fails validation.
pub fn load() -> Result<Config> {
    if std::env::var_os(DB_PATH_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("{DB_PATH_VAR} not set, trying config file");
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// Only `SITELEDGER_DB_PATH` is required; the rest fall back to defaults.
///
/// # Errors
/// Returns `SiteLedgerError::Config` if the path is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let path = env_var(DB_PATH_VAR)?;
    let pool_size = env_parse("SITELEDGER_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?;
    let standard_day_hours =
        env_parse("SITELEDGER_STANDARD_DAY_HOURS", DEFAULT_STANDARD_DAY_HOURS)?;
    let money_scale = env_parse("SITELEDGER_MONEY_SCALE", DEFAULT_MONEY_SCALE)?;

    let config = Config {
        database: DatabaseConfig { path, pool_size },
        payroll: PayrollConfig { standard_day_hours },
        billing: BillingConfig { money_scale },
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is
/// detected by file extension.
///
/// # Errors
/// Returns `SiteLedgerError::Config` if the file is missing, cannot be
/// parsed, or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SiteLedgerError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SiteLedgerError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SiteLedgerError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SiteLedgerError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SiteLedgerError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SiteLedgerError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SiteLedgerError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable, using `default` when
/// it is unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| SiteLedgerError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
