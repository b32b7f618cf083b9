//! Request handlers for the public route.

pub mod visit;
