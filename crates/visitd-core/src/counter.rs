//! Visit counter contract.
//!
//! A counter is a single integer under a fixed key in an external key-value
//! store. Each visit increments it by exactly one through the store's atomic
//! increment primitive; a missing key counts as 0. No client-side locking is
//! done here, so a `CounterStore` implementation must make `incr` atomic.

use std::fmt;

use async_trait::async_trait;

use crate::error::{Result, VisitError};

/// Key used when none is configured.
pub const DEFAULT_KEY: &str = "visits";

/// Validated counter key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey(String);

impl CounterKey {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VisitError::BadConfig("counter key must not be empty".into()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CounterKey {
    fn default() -> Self {
        Self(DEFAULT_KEY.to_string())
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Post-increment visit count. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisitCount(u64);

impl VisitCount {
    /// Validate the raw reply of an increment.
    ///
    /// After `INCR` the value is at least 1 unless the key already held a
    /// negative number, which is not a visit count.
    pub fn from_reply(key: &CounterKey, raw: i64) -> Result<Self> {
        if raw < 1 {
            return Err(VisitError::invalid_counter(
                key.as_str(),
                format!("increment returned {raw}, counter must be positive"),
            ));
        }
        Ok(Self(raw as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VisitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response text for a visit.
pub fn greeting(count: VisitCount) -> String {
    format!("Hello World! This page has been visited {count} times.")
}

/// External key-value store holding the counter.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Short backend name for logs and metrics labels.
    fn backend(&self) -> &'static str;

    /// Atomically increment `key` by one and return the new value.
    /// A missing key is initialised to 0 before the increment.
    async fn incr(&self, key: &CounterKey) -> Result<i64>;

    /// Round-trip check used by readiness probes.
    async fn ping(&self) -> Result<()>;
}
