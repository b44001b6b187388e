//! Public renderings of the current assignment: `/overlay` and `/css`.
//!
//! Both are meant to be polled by streaming software, so a missing or
//! incomplete assignment is never a 500: the viewer is sent back to the
//! selection page with the reason in the `error` query parameter.

use std::sync::Arc;

use askama::Template;
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tracing::warn;

use crewcolor_core::error::BoardError;

use crate::error::{PageError, redirect_with_error};
use crate::state::AppState;
use crate::templates::{OverlayPage, Stylesheet};

/// Build the overlay router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/overlay", get(overlay))
        .route("/css", get(stylesheet))
}

async fn overlay(State(state): State<Arc<AppState>>) -> Result<Response, PageError> {
    let colors = match state.board.assigned_colors().await {
        Ok(colors) => colors,
        Err(err) => return Ok(incomplete(&err)),
    };

    let html = OverlayPage { colors }.render()?;
    Ok(Html(html).into_response())
}

async fn stylesheet(State(state): State<Arc<AppState>>) -> Result<Response, PageError> {
    let colors = match state.board.assigned_colors().await {
        Ok(colors) => colors,
        Err(err) => return Ok(incomplete(&err)),
    };

    let css = Stylesheet::new(colors).render()?;
    Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response())
}

fn incomplete(err: &BoardError) -> Response {
    if matches!(err, BoardError::Storage(_) | BoardError::CorruptCount { .. }) {
        warn!(error = %err, "cannot read color assignment");
    }
    redirect_with_error(&err.to_string())
}
