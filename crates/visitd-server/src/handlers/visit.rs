//! `GET /`: count a visit and greet.
//!
//! One atomic increment per request, bounded by the configured store timeout.
//! No retries: a failed or slow store call surfaces as an error response.

use std::time::Instant;

use axum::extract::State;

use visitd_core::counter::{greeting, VisitCount};
use visitd_core::error::{Result, VisitError};

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn visit(State(state): State<AppState>) -> std::result::Result<String, ApiError> {
    let metrics = state.metrics();
    match record_visit(&state).await {
        Ok(count) => {
            metrics.visits.inc(&[("outcome", "ok")]);
            metrics.record_count(count.get());
            tracing::debug!(count = count.get(), "visit recorded");
            Ok(greeting(count))
        }
        Err(e) => {
            let code = e.client_code().as_str();
            metrics.visits.inc(&[("outcome", code)]);
            tracing::warn!(key = %state.counter_key(), error = %e, "visit failed");
            Err(ApiError(e))
        }
    }
}

/// Increment the counter and validate the reply.
pub async fn record_visit(state: &AppState) -> Result<VisitCount> {
    let store = state.store();
    let key = state.counter_key();
    let metrics = state.metrics();

    let started = Instant::now();
    let res = tokio::time::timeout(state.store_timeout(), store.incr(key)).await;
    metrics
        .store_duration
        .observe(&[("backend", store.backend())], started.elapsed());

    let raw = match res {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            metrics
                .store_errors
                .inc(&[("backend", store.backend()), ("kind", e.client_code().as_str())]);
            return Err(e);
        }
        Err(_) => {
            metrics
                .store_errors
                .inc(&[("backend", store.backend()), ("kind", "TIMEOUT")]);
            return Err(VisitError::StoreUnavailable(format!(
                "timeout after {}ms",
                state.store_timeout().as_millis()
            )));
        }
    };

    VisitCount::from_reply(key, raw)
}
