//! Server configuration for `crewcolor`.
//!
//! Loads configuration from environment variables. Credentials and the Redis
//! URL have no defaults; everything else does.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use subtle::ConstantTimeEq;

/// Errors raised while reading configuration. All of them are fatal at
/// startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("environment variable {name} is required")]
    Missing { name: &'static str },

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Shared credentials guarding the selection page.
    pub credentials: Credentials,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory served under `/img`.
    pub img_dir: PathBuf,
    /// Whether `POST /color` also requires the shared credentials.
    pub gate_submit: bool,
    /// Deadline applied to every request, store calls included.
    pub request_timeout: Duration,
}

/// The single username/password pair accepted by the auth gate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Supported storage backend types.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// Redis at the given URL.
    Redis { url: String },
}

impl Credentials {
    /// Exact comparison of both fields, in constant time per field.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage_backend", &self.storage_backend)
            .field("credentials", &self.credentials)
            .field("log_level", &self.log_level)
            .field("img_dir", &self.img_dir)
            .field("gate_submit", &self.gate_submit)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for StorageBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Redis { .. } => f.debug_struct("Redis").field("url", &"[redacted]").finish(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on `0.0.0.0` (default: `8080`)
    /// - `CREWCOLOR_BIND_ADDR`: full bind address, overrides `PORT`
    /// - `CREWCOLOR_STORAGE`: `redis` or `memory` (default: `redis`)
    /// - `REDIS_URL`: Redis connection URL (required for `redis`)
    /// - `USERNAME` / `PASSWORD`: shared credentials (required)
    /// - `CREWCOLOR_LOG_LEVEL`: log filter (default: `info`)
    /// - `CREWCOLOR_IMG_DIR`: swatch directory (default: `./img`)
    /// - `CREWCOLOR_GATE_SUBMIT`: gate `POST /color` too (default: `false`)
    /// - `CREWCOLOR_REQUEST_TIMEOUT_SECS`: per-request deadline (default: `10`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Empty values
    /// are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing { name });

        // Priority: CREWCOLOR_BIND_ADDR > PORT > 0.0.0.0:8080
        let bind_addr = if let Some(addr) = var("CREWCOLOR_BIND_ADDR") {
            addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                name: "CREWCOLOR_BIND_ADDR",
                reason: format!("{e}"),
            })?
        } else {
            let port: u16 = var("PORT")
                .map_or(Ok(8080), |p| p.parse())
                .map_err(|e| ConfigError::Invalid {
                    name: "PORT",
                    reason: format!("{e}"),
                })?;
            SocketAddr::from(([0, 0, 0, 0], port))
        };

        let storage_backend = match var("CREWCOLOR_STORAGE")
            .unwrap_or_else(|| "redis".to_owned())
            .to_lowercase()
            .as_str()
        {
            "redis" => StorageBackendType::Redis {
                url: required("REDIS_URL")?,
            },
            "memory" => StorageBackendType::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "CREWCOLOR_STORAGE",
                    reason: format!("unknown storage '{other}', expected 'redis' or 'memory'"),
                });
            }
        };

        let credentials = Credentials {
            username: required("USERNAME")?,
            password: required("PASSWORD")?,
        };

        let log_level = var("CREWCOLOR_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let img_dir = var("CREWCOLOR_IMG_DIR").map_or_else(|| PathBuf::from("./img"), PathBuf::from);

        let gate_submit = var("CREWCOLOR_GATE_SUBMIT").is_some_and(|v| v == "true" || v == "1");

        let request_timeout = var("CREWCOLOR_REQUEST_TIMEOUT_SECS")
            .map_or(Ok(10), |v| v.parse::<u64>())
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid {
                name: "CREWCOLOR_REQUEST_TIMEOUT_SECS",
                reason: format!("{e}"),
            })?;

        Ok(Self {
            bind_addr,
            storage_backend,
            credentials,
            log_level,
            img_dir,
            gate_submit,
            request_timeout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    const BASE: [(&str, &str); 3] = [
        ("REDIS_URL", "redis://:pw@localhost:6379"),
        ("USERNAME", "host"),
        ("PASSWORD", "s3cret"),
    ];

    #[test]
    fn defaults() {
        let config = load(&BASE).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(
            config.storage_backend,
            StorageBackendType::Redis {
                url: "redis://:pw@localhost:6379".to_owned()
            }
        );
        assert_eq!(config.credentials.username, "host");
        assert_eq!(config.credentials.password, "s3cret");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.img_dir, PathBuf::from("./img"));
        assert!(!config.gate_submit);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn port_override() {
        let mut vars = BASE.to_vec();
        vars.push(("PORT", "3000"));
        let config = load(&vars).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn bind_addr_wins_over_port() {
        let mut vars = BASE.to_vec();
        vars.push(("PORT", "3000"));
        vars.push(("CREWCOLOR_BIND_ADDR", "127.0.0.1:9999"));
        let config = load(&vars).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9999)));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("PORT", "http"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn missing_redis_url() {
        let err = load(&BASE[1..]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "REDIS_URL" }));
        assert_eq!(err.to_string(), "environment variable REDIS_URL is required");
    }

    #[test]
    fn missing_username() {
        let err = load(&[BASE[0], BASE[2]]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "USERNAME" }));
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let err = load(&[BASE[0], BASE[1], ("PASSWORD", "")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "PASSWORD" }));
    }

    #[test]
    fn memory_storage_needs_no_redis_url() {
        let config = load(&[BASE[1], BASE[2], ("CREWCOLOR_STORAGE", "memory")]).unwrap();
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
    }

    #[test]
    fn unknown_storage_is_rejected() {
        let mut vars = BASE.to_vec();
        vars.push(("CREWCOLOR_STORAGE", "rocksdb"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn gate_submit_flag() {
        let mut vars = BASE.to_vec();
        vars.push(("CREWCOLOR_GATE_SUBMIT", "true"));
        assert!(load(&vars).unwrap().gate_submit);
    }

    #[test]
    fn credentials_match_exactly() {
        let creds = load(&BASE).unwrap().credentials;
        assert!(creds.matches("host", "s3cret"));
        assert!(!creds.matches("host", "s3cre"));
        assert!(!creds.matches("Host", "s3cret"));
        assert!(!creds.matches("", ""));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&BASE).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains(":pw@"));
        assert!(rendered.contains("host"));
    }
}
