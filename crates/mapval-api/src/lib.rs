//! # mapval-api — Axum Adapters
//!
//! HTTP surface for the validation engine.
//!
//! - [`extractors`]: `validate_json` / `validate_multipart` helpers usable
//!   from any handler.
//! - [`error::ApiError`]: maps ingestion and validation failures to
//!   `{"error": {"code", "kind", "message"}}` responses.
//! - [`app`]: a ready router serving one validator.
//!
//! ## Routes
//!
//! | Path | Module |
//! |---|---|
//! | `/v1/validate`, `/v1/validate/form` | [`routes::validate`] |
//! | `/health/liveness` | this module |
//!
//! Outcomes are counted in `mapval_requests_total{outcome}`. No exporter is
//! installed here.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extractors::{validate_json, validate_multipart};
pub use state::ApiState;

/// Assemble the router with validation routes and the liveness probe.
pub fn app(state: ApiState) -> Router {
    Router::new()
        .merge(routes::validate::router())
        .route("/health/liveness", get(liveness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "ok"
}
