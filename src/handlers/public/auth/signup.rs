// handlers/public/auth/signup.rs - GET|POST /signup

use axum::{extract::State, response::Response, Form};
use tower_cookies::Cookies;

use super::AFTER_LOGIN;
use crate::app::AppState;
use crate::auth::{hash_password, Identity, SessionKeys};
use crate::database::{DatabaseError, UserStore};
use crate::error::TodoError;
use crate::forms::SignupForm;
use crate::middleware::Outcome;
use crate::views::View;

pub fn page() -> Outcome {
    Outcome::render(View::Signup {
        username: String::new(),
    })
}

/// Create an account and sign it in.
///
/// Checks run in order: required fields, password confirmation, then the
/// username's availability. Nothing is written unless all of them pass.
pub async fn submit<S>(users: &S, sessions: &SessionKeys, form: SignupForm) -> Result<Outcome, TodoError>
where
    S: UserStore + ?Sized,
{
    match register(users, &form).await {
        Ok(identity) => {
            let token = sessions.issue(&identity)?;
            tracing::info!("Created new user: {}", identity.username);
            Ok(Outcome::sign_in(AFTER_LOGIN, sessions.cookie(token)))
        }
        Err(err) if err.is_recoverable() => Ok(Outcome::render_error(
            View::Signup {
                username: form.username.trim().to_string(),
            },
            err,
        )),
        Err(err) => Err(err),
    }
}

async fn register<S>(users: &S, form: &SignupForm) -> Result<Identity, TodoError>
where
    S: UserStore + ?Sized,
{
    let account = form.validate()?;

    if users.find_user_by_username(&account.username).await?.is_some() {
        return Err(TodoError::DuplicateUsername);
    }

    let password_hash = hash_password(&account.password).await?;

    // The unique constraint still decides when two sign-ups race
    let user = users
        .create_user(&account.username, &password_hash)
        .await
        .map_err(|e| match e {
            DatabaseError::Duplicate(_) => TodoError::DuplicateUsername,
            other => other.into(),
        })?;

    Ok(Identity {
        user_id: user.id,
        username: user.username,
    })
}

pub async fn get() -> Outcome {
    page()
}

pub async fn post(State(state): State<AppState>, cookies: Cookies, Form(form): Form<SignupForm>) -> Response {
    submit(&*state.store, &state.sessions, form)
        .await
        .unwrap_or_else(TodoError::into_outcome)
        .respond(&cookies)
}
