//! Shared application state for the visit service.
//!
//! The store handle is injected here and nowhere else: handlers reach the
//! counter only through `AppState::store()`, so tests can substitute any
//! `CounterStore`.

use std::sync::Arc;
use std::time::Duration;

use visitd_core::counter::{CounterKey, CounterStore};
use visitd_core::error::Result;

use crate::config::ServiceConfig;
use crate::obs::metrics::VisitMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<dyn CounterStore>,
    metrics: Arc<VisitMetrics>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    key: CounterKey,
    store_timeout: Duration,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServiceConfig, store: Arc<dyn CounterStore>) -> Result<Self> {
        cfg.validate()?;
        let key = cfg.store.counter_key()?;
        let store_timeout = cfg.store.timeout();

        tracing::info!(backend = store.backend(), key = %key, timeout_ms = cfg.store.timeout_ms, "counter store wired");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, key, store_timeout }),
            store,
            metrics: Arc::new(VisitMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn counter_key(&self) -> &CounterKey {
        &self.inner.key
    }

    pub fn store_timeout(&self) -> Duration {
        self.inner.store_timeout
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<VisitMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }
}
