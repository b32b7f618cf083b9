#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use visitd_core::{greeting, ClientCode, CounterKey, VisitCount, VisitError};

#[test]
fn greeting_carries_hello_and_count() {
    let key = CounterKey::default();
    let text = greeting(VisitCount::from_reply(&key, 2).unwrap());
    assert!(text.contains("Hello"));
    assert!(text.contains("visited 2"));
}

#[test]
fn default_key_is_visits() {
    assert_eq!(CounterKey::default().as_str(), "visits");
}

#[test]
fn empty_key_is_rejected() {
    let err = CounterKey::new("   ").expect_err("must fail");
    assert_eq!(err.client_code(), ClientCode::BadConfig);
}

#[test]
fn non_positive_reply_is_invalid_counter() {
    let key = CounterKey::new("hits").unwrap();
    for raw in [0, -1, i64::MIN] {
        let err = VisitCount::from_reply(&key, raw).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "INVALID_COUNTER");
        match err {
            VisitError::InvalidCounter { key, .. } => assert_eq!(key, "hits"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn client_codes_are_stable() {
    assert_eq!(
        VisitError::StoreUnavailable("refused".into()).client_code().as_str(),
        "STORE_UNAVAILABLE"
    );
    assert_eq!(VisitError::Internal("x".into()).client_code().as_str(), "INTERNAL");
}
