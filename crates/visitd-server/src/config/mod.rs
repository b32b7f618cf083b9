//! Service config loader.
//!
//! Defaults, then an optional strict YAML file (`VISITD_CONFIG`), then
//! environment overrides. The result is validated once and handed to the
//! store constructor and the app state.

pub mod schema;

use std::fs;

use visitd_core::error::{Result, VisitError};

pub use schema::{ServerSection, ServiceConfig, StoreSection};

/// Path of an optional YAML config file.
pub const ENV_CONFIG_PATH: &str = "VISITD_CONFIG";
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
pub const ENV_LISTEN: &str = "VISITD_LISTEN";
pub const ENV_COUNTER_KEY: &str = "VISITD_COUNTER_KEY";
pub const ENV_STORE_TIMEOUT_MS: &str = "VISITD_STORE_TIMEOUT_MS";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VisitError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| VisitError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Build config from the process environment.
pub fn from_env() -> Result<ServiceConfig> {
    let base = match std::env::var(ENV_CONFIG_PATH) {
        Ok(path) => {
            tracing::info!(%path, "loading config file");
            load_from_file(&path)?
        }
        Err(_) => ServiceConfig::default(),
    };
    apply_env(base, |name| std::env::var(name).ok())
}

/// Apply environment overrides through `lookup`, then validate.
pub fn apply_env<F>(mut cfg: ServiceConfig, lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_REDIS_HOST) {
        cfg.store.host = host;
    }
    if let Some(port) = lookup(ENV_REDIS_PORT) {
        cfg.store.port = parse_env(ENV_REDIS_PORT, &port)?;
    }
    if let Some(key) = lookup(ENV_COUNTER_KEY) {
        cfg.store.key = key;
    }
    if let Some(ms) = lookup(ENV_STORE_TIMEOUT_MS) {
        cfg.store.timeout_ms = parse_env(ENV_STORE_TIMEOUT_MS, &ms)?;
    }
    if let Some(listen) = lookup(ENV_LISTEN) {
        cfg.server.listen = listen;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| VisitError::BadConfig(format!("{name}={raw:?} is invalid: {e}")))
}
