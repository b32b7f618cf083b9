//! Top-level facade crate for visitd.
//!
//! Re-exports the counter contract and the HTTP service so users can depend on a single crate.

pub mod core {
    pub use visitd_core::*;
}

pub mod server {
    pub use visitd_server::*;
}
