//! visitd server library entry.
//!
//! Wires config, the counter store, and the HTTP surface into one service.
//! Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
