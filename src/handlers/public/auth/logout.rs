// handlers/public/auth/logout.rs - POST /logout

use axum::response::Response;
use tower_cookies::Cookies;

use crate::auth::Identity;
use crate::middleware::{CurrentIdentity, Outcome};

/// Drop the session and go home. Anonymous callers get the same redirect.
pub fn submit(identity: Option<&Identity>) -> Outcome {
    if let Some(identity) = identity {
        tracing::info!("User {} logged out", identity.username);
    }
    Outcome::sign_out("/")
}

pub async fn post(CurrentIdentity(identity): CurrentIdentity, cookies: Cookies) -> Response {
    submit(identity.as_ref()).respond(&cookies)
}
