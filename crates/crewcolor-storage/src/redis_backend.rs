//! Redis storage backend, the production default.
//!
//! Wraps a [`redis::aio::ConnectionManager`], which multiplexes one
//! connection across all tasks and reconnects on failure. Every trait call is
//! exactly one `GET` or `SET`; there is no pipelining and no retry beyond the
//! manager's own reconnect.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::debug;

use crate::{StorageBackend, StorageError};

/// Default bound on establishing a connection.
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on a single command round trip.
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A storage backend backed by Redis.
///
/// Cheap to clone; clones share the underlying connection manager.
///
/// # Examples
///
/// ```no_run
/// # use crewcolor_storage::RedisBackend;
/// # #[tokio::main]
/// # async fn main() {
/// let backend = RedisBackend::connect("redis://:secret@localhost:6379").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    addr: String,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// Connect to the Redis server named by `url` with default timeouts.
    ///
    /// The URL may carry a password (`redis://:password@host:port`); it is
    /// never logged or included in errors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connect`] if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        Self::connect_with_timeouts(url, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT).await
    }

    /// Connect with explicit connection and per-command timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connect`] if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect_with_timeouts(
        url: &str,
        connection_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = redis::Client::open(url).map_err(|e| StorageError::Connect {
            target: "[redacted]".to_owned(),
            reason: e.to_string(),
        })?;
        let addr = client.get_connection_info().addr.to_string();

        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(connection_timeout)
            .set_response_timeout(response_timeout);

        let conn = client
            .get_connection_manager_with_config(config)
            .await
            .map_err(|e| StorageError::Connect {
                target: addr.clone(),
                reason: e.to_string(),
            })?;

        debug!(addr = %addr, "connected to redis");
        Ok(Self { conn, addr })
    }

    /// The server address (host and port, no credentials).
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait::async_trait]
impl StorageBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| StorageError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_is_a_connect_error() {
        let err = RedisBackend::connect("not a url").await.unwrap_err();
        assert!(matches!(err, StorageError::Connect { .. }));
    }

    #[tokio::test]
    async fn connect_error_does_not_leak_password() {
        let err = RedisBackend::connect_with_timeouts(
            "redis://:hunter2@127.0.0.1:1",
            Duration::from_millis(200),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(!err.to_string().contains("hunter2"), "{err}");
    }

    /// Needs a live server: `CREWCOLOR_TEST_REDIS_URL=redis://127.0.0.1 cargo test -- --ignored`.
    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn live_set_and_get() {
        let url = std::env::var("CREWCOLOR_TEST_REDIS_URL").expect("CREWCOLOR_TEST_REDIS_URL");
        let backend = RedisBackend::connect(&url).await.unwrap();

        backend.set("crewcolor-test/0", "coral").await.unwrap();
        assert_eq!(
            backend.get("crewcolor-test/0").await.unwrap().as_deref(),
            Some("coral")
        );
        assert_eq!(backend.get("crewcolor-test/absent").await.unwrap(), None);
    }
}
