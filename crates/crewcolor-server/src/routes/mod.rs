//! HTTP route handlers for `crewcolor`.
//!
//! Routes are organized by concern:
//! - `pages`: `/` redirect and the gated `/select` form
//! - `colors`: `POST /color` submission (JSON or form-encoded)
//! - `overlay`: public `/overlay` and `/css` renderings
//!
//! Swatch images under `/img` are served straight from disk.

pub mod colors;
pub mod overlay;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware as axum_mw;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::basic_auth;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
///
/// `/select` always sits behind the Basic auth gate. `POST /color` joins it
/// only when `gate_submit` is set; by default it is public, like the overlay.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut gated = pages::gated_router();
    let mut public = pages::router().merge(overlay::router());

    if state.gate_submit {
        gated = gated.merge(colors::router());
    } else {
        public = public.merge(colors::router());
    }

    let gated = gated.route_layer(axum_mw::from_fn_with_state(
        Arc::clone(&state),
        basic_auth,
    ));

    // Overlay hosts fetch /css and /overlay cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.request_timeout))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    public
        .merge(gated)
        .nest_service("/img", ServeDir::new(&state.img_dir))
        .layer(layers)
        .with_state(state)
}
