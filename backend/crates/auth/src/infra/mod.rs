//! Infrastructure Layer
//!
//! Session store and user directory implementations.

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::{InMemorySessionStore, InMemoryUserDirectory};
pub use postgres::PgUserDirectory;
pub use redis::RedisSessionStore;
