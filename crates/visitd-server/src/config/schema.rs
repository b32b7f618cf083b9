use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use visitd_core::counter::{CounterKey, DEFAULT_KEY};
use visitd_core::error::{Result, VisitError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VisitError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            VisitError::BadConfig(format!("server.listen {:?} is not a socket address: {e}", self.listen))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            key: default_key(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(VisitError::BadConfig("store.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(VisitError::BadConfig("store.port must be between 1 and 65535".into()));
        }
        if !(50..=30000).contains(&self.timeout_ms) {
            return Err(VisitError::BadConfig(
                "store.timeout_ms must be between 50 and 30000".into(),
            ));
        }
        self.counter_key()?;
        Ok(())
    }

    pub fn counter_key(&self) -> Result<CounterKey> {
        CounterKey::new(self.key.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    6379
}
fn default_key() -> String {
    DEFAULT_KEY.into()
}
fn default_timeout_ms() -> u64 {
    1000
}
