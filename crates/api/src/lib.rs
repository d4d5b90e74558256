//! Read-only HTTP API over the archive.
//!
//! | Method | Path | |
//! |---|---|---|
//! | `GET` | `/api/apod` | every entry, oldest first; 404 when empty |
//! | `GET` | `/api/apod/{date}` | one entry; 400 on a malformed date, 404 when absent |
//! | `OPTIONS` | both | CORS preflight, or 204 |

mod error;
mod handlers;

pub use crate::error::ApiError;
use apod_archive::StoreHandle;
use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Build the application router around `store`.
pub fn router(store: StoreHandle) -> Router {
    Router::new()
        .route("/api/apod", get(handlers::list_entries).options(handlers::options))
        .route("/api/apod/{date}", get(handlers::get_entry).options(handlers::options))
        .layer(cors())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(store)
}

/// Any origin, with credentials.
///
/// A literal `*` can't be combined with credentials, so the request's
/// `Origin` is echoed back instead.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::OPTIONS, Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::SET_COOKIE,
            header::USER_AGENT,
            header::ORIGIN,
        ])
}
