use async_trait::async_trait;
use dashmap::DashMap;

use visitd_core::counter::{CounterKey, CounterStore};
use visitd_core::error::{Result, VisitError};

/// In-memory counter store.
///
/// Values are kept as strings, the way a key-value server stores them, and
/// parsed with redis' integer rules, so a key holding garbage behaves the same
/// as it would remotely. The map entry lock makes `incr` atomic.
#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a key with an arbitrary value.
    pub fn set_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.value().clone())
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn incr(&self, key: &CounterKey) -> Result<i64> {
        let mut entry = self
            .values
            .entry(key.as_str().to_string())
            .or_insert_with(|| "0".to_string());

        let current = parse_stored_int(entry.as_str()).ok_or_else(|| {
            VisitError::invalid_counter(key.as_str(), "value is not an integer or out of range")
        })?;
        let next = current.checked_add(1).ok_or_else(|| {
            VisitError::invalid_counter(key.as_str(), "increment would overflow")
        })?;

        *entry = next.to_string();
        Ok(next)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Strict decimal parse as `INCR` applies it: no whitespace, no `+`,
/// no leading zeros, no `-0`.
fn parse_stored_int(s: &str) -> Option<i64> {
    if s == "0" {
        return Some(0);
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn missing_key_starts_at_one() {
        let store = MemoryStore::new();
        let key = CounterKey::default();
        assert_eq!(store.incr(&key).await.unwrap(), 1);
        assert_eq!(store.incr(&key).await.unwrap(), 2);
        assert_eq!(store.get_raw("visits").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn non_integer_value_is_rejected_and_left_alone() {
        let store = MemoryStore::new();
        store.set_raw("visits", "lots");
        let err = store.incr(&CounterKey::default()).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_COUNTER");
        assert_eq!(store.get_raw("visits").as_deref(), Some("lots"));
    }

    #[tokio::test]
    async fn loosely_formatted_integers_are_rejected() {
        let store = MemoryStore::new();
        let key = CounterKey::default();
        for raw in [" 5", "5 ", "+5", "007", "-0", "-", ""] {
            store.set_raw("visits", raw);
            let err = store.incr(&key).await.unwrap_err();
            assert_eq!(err.client_code().as_str(), "INVALID_COUNTER", "value {raw:?}");
            assert_eq!(store.get_raw("visits").as_deref(), Some(raw));
        }
    }

    #[tokio::test]
    async fn canonical_integers_are_accepted() {
        let store = MemoryStore::new();
        let key = CounterKey::default();
        store.set_raw("visits", "0");
        assert_eq!(store.incr(&key).await.unwrap(), 1);
        store.set_raw("visits", "-3");
        assert_eq!(store.incr(&key).await.unwrap(), -2);
        store.set_raw("visits", "10");
        assert_eq!(store.incr(&key).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn overflow_is_rejected() {
        let store = MemoryStore::new();
        store.set_raw("visits", i64::MAX.to_string());
        let err = store.incr(&CounterKey::default()).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_COUNTER");
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let mut tasks = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let key = CounterKey::default();
                for _ in 0..10 {
                    store.incr(&key).await.unwrap();
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(store.get_raw("visits").as_deref(), Some("320"));
    }
}
