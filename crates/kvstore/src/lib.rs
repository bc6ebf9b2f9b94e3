//! Key-value storage for risk calculations.
//!
//! Provides:
//! - A backend-agnostic async `KvStore` trait
//! - A Redis implementation used in production
//! - An in-memory implementation for tests
//! - The key schema shared by producers and consumers
//! - Block descriptor registration under the job namespace

pub mod blocks;
pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::KvStore;
