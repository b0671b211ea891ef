use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::app::AppState;
use crate::auth::{Identity, SESSION_COOKIE};

/// Session middleware: decodes the session cookie and, when it is valid and
/// its account still exists, injects the `Identity` into the request.
/// Anything else is an anonymous request; the protected handlers decide what
/// that means.
pub async fn session_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        match state.sessions.verify(cookie.value()) {
            Ok(claimed) => {
                if let Some(identity) = current_account(&state, claimed).await {
                    request.extensions_mut().insert(identity);
                }
            }
            Err(e) => {
                tracing::debug!("Ignoring session cookie: {}", e);
            }
        }
    }

    next.run(request).await
}

/// Resolve a verified token against the user store. A token can outlive its
/// account (store reset, in-memory restart with the same secret).
async fn current_account(state: &AppState, claimed: Identity) -> Option<Identity> {
    match state.store.get_user(claimed.user_id).await {
        Ok(Some(user)) => Some(Identity {
            user_id: user.id,
            username: user.username,
        }),
        Ok(None) => {
            tracing::debug!("Session for unknown user {} ignored", claimed.user_id);
            None
        }
        Err(e) => {
            tracing::warn!("Could not load session user {}: {}", claimed.user_id, e);
            None
        }
    }
}

/// Extractor for the identity established by `session_middleware`, if any
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}
