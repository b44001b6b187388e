//! Storage backend abstraction for `crewcolor`.
//!
//! This crate defines the [`StorageBackend`] trait, a plain string key-value
//! interface with no knowledge of palettes, members, or HTTP. The color board
//! in `crewcolor-core` is the only layer that decides which keys exist.
//!
//! Two implementations are provided:
//!
//! - [`RedisBackend`]: production default, backed by Redis (feature `redis-backend`)
//! - [`MemoryBackend`]: in-memory, for development and tests

mod error;
mod memory;
#[cfg(feature = "redis-backend")]
mod redis_backend;

pub use error::StorageError;
pub use memory::MemoryBackend;
#[cfg(feature = "redis-backend")]
pub use redis_backend::RedisBackend;

/// A pluggable key-value storage backend.
///
/// Keys and values are UTF-8 strings. Values never expire; a [`set`] simply
/// overwrites what was there. There are no transactions: every call is a
/// single round trip and atomicity is per key only.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
///
/// [`set`]: StorageBackend::set
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist. An absent key is a
    /// normal state, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
