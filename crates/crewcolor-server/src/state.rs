//! Shared application state for `crewcolor` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the color board (and through it the
//! storage backend) plus the few settings handlers and the router need.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crewcolor_core::board::ColorBoard;
use crewcolor_storage::StorageBackend;

use crate::config::{Credentials, ServerConfig};

/// Shared application state passed to all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Member count and color assignments.
    pub board: ColorBoard,
    /// Credentials checked by the auth gate.
    pub credentials: Credentials,
    /// Whether `POST /color` sits behind the auth gate.
    pub gate_submit: bool,
    /// Directory served under `/img`.
    pub img_dir: PathBuf,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
}

impl AppState {
    /// Assemble the state from loaded configuration and an opened backend.
    #[must_use]
    pub fn new(config: &ServerConfig, storage: Arc<dyn StorageBackend>) -> Arc<Self> {
        Arc::new(Self {
            board: ColorBoard::new(storage),
            credentials: config.credentials.clone(),
            gate_submit: config.gate_submit,
            img_dir: config.img_dir.clone(),
            request_timeout: config.request_timeout,
        })
    }
}
