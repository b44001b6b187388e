//! Color submission: `POST /color`.
//!
//! Accepts two body shapes, picked by `Content-Type`:
//!
//! - JSON (`{"num_of_member": 4, "colors": ["red", ...]}`): errors come back
//!   as 4xx/5xx with a `{"error", "message"}` body, success is `200 {}`.
//! - Form-encoded (what the `/select` page posts: `numOfMember=4&0=red&...`):
//!   every outcome is a `302` back to `/select`, with the error message in
//!   the query string when something went wrong.
//!
//! Either way the count is stored first and colors follow one key at a
//! time; see [`ColorBoard::submit`](crewcolor_core::board::ColorBoard::submit).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

use crewcolor_core::board::Submission;

use crate::error::{ApiError, SELECT_PATH, found, redirect_with_error};
use crate::state::AppState;

/// Form field carrying the member count.
pub const MEMBER_COUNT_FIELD: &str = "numOfMember";

const COUNT_UNPARSEABLE: &str = "count cannot be parsed";

/// Build the submission router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/color", post(submit_colors))
}

// ── Request types ────────────────────────────────────────────────────

/// JSON submission body.
///
/// `num_of_member` is kept loose so a wrong type is reported as an
/// unparseable count instead of a generic decode failure. `null` entries in
/// `colors` count as unselected.
#[derive(Debug, Deserialize)]
pub struct PostColorRequest {
    #[serde(default)]
    pub num_of_member: serde_json::Value,
    #[serde(default)]
    pub colors: Vec<Option<String>>,
}

impl PostColorRequest {
    fn into_submission(self) -> Option<Submission> {
        let member_count = usize::try_from(self.num_of_member.as_u64()?).ok()?;
        let colors = self
            .colors
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        Some(Submission {
            member_count,
            colors,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn submit_colors(State(state): State<Arc<AppState>>, req: Request) -> Response {
    if is_form(&req) {
        submit_form(&state, req).await
    } else {
        submit_json(&state, req).await.into_response()
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

async fn submit_json(state: &Arc<AppState>, req: Request) -> Result<Response, ApiError> {
    let body = Bytes::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest {
            cause: e.body_text(),
            message: "cannot read request body".to_owned(),
        })?;

    let request: PostColorRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
            cause: e.to_string(),
            message: "cannot parse request body as json".to_owned(),
        })?;

    let submission = request.into_submission().ok_or_else(|| ApiError::BadRequest {
        cause: String::new(),
        message: COUNT_UNPARSEABLE.to_owned(),
    })?;

    state.board.submit(&submission).await?;

    Ok((StatusCode::OK, Json(serde_json::json!({}))).into_response())
}

async fn submit_form(state: &Arc<AppState>, req: Request) -> Response {
    let Form(fields) = match Form::<HashMap<String, String>>::from_request(req, state).await {
        Ok(form) => form,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "unreadable form submission");
            return redirect_with_error("cannot parse form body");
        }
    };

    let Some(submission) = form_submission(&fields) else {
        return redirect_with_error(COUNT_UNPARSEABLE);
    };

    match state.board.submit(&submission).await {
        Ok(()) => found(SELECT_PATH),
        Err(err) => {
            if !err.is_client_error() {
                warn!(error = %err, "form submission failed");
            }
            redirect_with_error(&err.to_string())
        }
    }
}

/// Turn form fields into a submission. Colors are collected up to the first
/// missing or empty field; the board reports that position as unselected.
fn form_submission(fields: &HashMap<String, String>) -> Option<Submission> {
    let member_count: usize = fields.get(MEMBER_COUNT_FIELD)?.trim().parse().ok()?;

    let colors = (0..member_count)
        .map_while(|index| {
            fields
                .get(&index.to_string())
                .filter(|color| !color.is_empty())
                .cloned()
        })
        .collect();

    Some(Submission {
        member_count,
        colors,
    })
}
