// handlers/mod.rs - request handlers, split by access level
//
// Public (no identity needed) → Protected (identity required, owner-scoped)
//
// Each handler module exposes the core operation as a plain async fn taking
// the store, an explicit `Option<&Identity>` and the form, returning an
// `Outcome`; the axum-facing `*_get` / `*_post` functions only extract and
// delegate.
pub mod health;
pub mod protected;
pub mod public;

pub use health::health;
pub use public::home::home;

use axum::response::{IntoResponse, Response};

use crate::middleware::Outcome;

/// Fallback for any unmatched route
pub async fn not_found() -> Response {
    Outcome::not_found().into_response()
}

/// Fallback for non-POST requests to POST-only actions
pub async fn method_not_allowed() -> Response {
    Outcome::method_not_allowed().into_response()
}
