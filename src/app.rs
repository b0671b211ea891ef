use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::auth::SessionKeys;
use crate::database::Store;
use crate::handlers;
use crate::middleware::session_middleware;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionKeys) -> Self {
        Self { store, sessions }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::home))
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(todo_routes())
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/login", get(auth::login_get).post(auth::login_post))
        .route("/signup", get(auth::signup_get).post(auth::signup_post))
        .route(
            "/logout",
            post(auth::logout_post).fallback(handlers::method_not_allowed),
        )
}

fn todo_routes() -> Router<AppState> {
    use handlers::protected::todos;

    Router::new()
        .route("/todos", get(todos::pending_get))
        .route("/todos/completed", get(todos::completed_get))
        .route("/todos/create", get(todos::create_get).post(todos::create_post))
        .route("/todos/:id", get(todos::detail_get).post(todos::detail_post))
        // State changes only on an explicit POST from the page's button
        .route(
            "/todos/:id/complete",
            post(todos::complete_post).fallback(handlers::method_not_allowed),
        )
        .route(
            "/todos/:id/delete",
            post(todos::delete_post).fallback(handlers::method_not_allowed),
        )
}
