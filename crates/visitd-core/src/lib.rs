//! visitd core: the counter contract and the error surface.
//!
//! This crate defines what a counter store must guarantee and how a visit is
//! rendered, without pulling in any transport or runtime. The HTTP service
//! and any test doubles build on these types.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths must surface as `VisitError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod error;

pub use counter::{greeting, CounterKey, CounterStore, VisitCount};
/// Shared result type.
pub use error::{ClientCode, Result, VisitError};
