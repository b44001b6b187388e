//! HTTP error types for `crewcolor` server.
//!
//! Two flavors, one per kind of endpoint:
//! - [`ApiError`] for the JSON submit API: a status code plus a
//!   `{"error", "message"}` body, where `error` carries the underlying cause
//!   and `message` the human-readable summary.
//! - [`PageError`] for HTML/CSS pages: a bare 500, with the cause logged.
//!
//! Redirect-with-message responses are built with [`redirect_with_error`].

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crewcolor_core::error::BoardError;

/// Path the flash-message redirects point at.
pub const SELECT_PATH: &str = "/select";

/// Error returned from the JSON submit API.
#[derive(Debug)]
pub enum ApiError {
    /// Client sent invalid input.
    BadRequest { cause: String, message: String },
    /// The store failed.
    Internal { cause: String, message: String },
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, cause, message) = match self {
            Self::BadRequest { cause, message } => (StatusCode::BAD_REQUEST, cause, message),
            Self::Internal { cause, message } => {
                warn!(cause = %cause, "submit failed");
                (StatusCode::INTERNAL_SERVER_ERROR, cause, message)
            }
        };

        let body = ErrorBody {
            error: cause,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::ColorNotSelected { .. } => Self::BadRequest {
                cause: String::new(),
                message: err.to_string(),
            },
            BoardError::Storage(ref inner) => Self::Internal {
                cause: inner.to_string(),
                message: "cannot save colors into the store".to_owned(),
            },
            BoardError::CountNotSet
            | BoardError::CorruptCount { .. }
            | BoardError::ColorNotSet { .. } => Self::Internal {
                cause: err.to_string(),
                message: "unexpected board state".to_owned(),
            },
        }
    }
}

/// Error returned from HTML and CSS pages. Always a bare 500.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self, "page failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// A `302 Found` pointing at `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Redirect back to the selection page carrying `message` in the `error`
/// query parameter.
pub fn redirect_with_error(message: &str) -> Response {
    found(&format!("{SELECT_PATH}?error={}", urlencoding::encode(message)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crewcolor_storage::StorageError;

    #[test]
    fn unselected_color_is_bad_request() {
        let err = ApiError::from(BoardError::ColorNotSelected { position: 2 });
        let ApiError::BadRequest { cause, message } = err else {
            unreachable!("expected bad request");
        };
        assert!(cause.is_empty());
        assert_eq!(message, "2-th color is not selected");
    }

    #[test]
    fn storage_failure_is_internal_with_cause() {
        let err = ApiError::from(BoardError::Storage(StorageError::Write {
            key: "0".to_owned(),
            reason: "broken pipe".to_owned(),
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn redirect_escapes_message() {
        let response = redirect_with_error("numOfMember has not been set");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/select?error=numOfMember%20has%20not%20been%20set"
        );
    }

    #[test]
    fn page_error_is_bare_500() {
        let response = PageError::from(BoardError::CountNotSet).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
