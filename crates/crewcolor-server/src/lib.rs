//! `crewcolor` HTTP server.
//!
//! Wires the color board, storage backend, templates, and auth gate into an
//! Axum router: the operator picks colors at `/select`, streaming software
//! polls `/overlay` or `/css`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;
