//! Counter store backends.
//!
//! - `RedisStore`  : production backend, `INCR` on a redis server
//! - `MemoryStore` : in-process double with the same increment contract
//!
//! Both implement `visitd_core::CounterStore`; the service only ever sees the
//! trait object injected through `AppState`.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;
