//! Operator-facing pages: `/` and `/select`.

use std::sync::Arc;

use askama::Template;
use axum::Router;
use axum::extract::{Query, State};
use axum::response::{Html, Response};
use axum::routing::get;
use serde::Deserialize;

use crewcolor_core::palette;

use crate::error::{PageError, SELECT_PATH, found};
use crate::state::AppState;
use crate::templates::SelectPage;

/// Public page routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Page routes that require the auth gate.
pub fn gated_router() -> Router<Arc<AppState>> {
    Router::new().route(SELECT_PATH, get(select_page))
}

#[derive(Debug, Deserialize)]
pub struct SelectParams {
    /// Message left by a failed submission or overlay request.
    #[serde(default)]
    pub error: String,
}

async fn index() -> Response {
    found(SELECT_PATH)
}

/// Render the selection form, pre-populated with whatever is stored.
///
/// Reads all 15 color slots regardless of the stored count so swatches stay
/// selected when the operator changes the count.
async fn select_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectParams>,
) -> Result<Html<String>, PageError> {
    let member_count = state.board.member_count().await?;
    let saved_colors = state.board.saved_colors(palette::MAX_MEMBERS).await?;

    let page = SelectPage::new(member_count, &saved_colors, params.error);
    Ok(Html(page.render()?))
}
