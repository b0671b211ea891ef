// handlers/public/auth/login.rs - GET|POST /login

use axum::{extract::State, response::Response, Form};
use tower_cookies::Cookies;

use super::AFTER_LOGIN;
use crate::app::AppState;
use crate::auth::{verify_password, Identity, SessionKeys};
use crate::database::UserStore;
use crate::error::TodoError;
use crate::forms::LoginForm;
use crate::middleware::Outcome;
use crate::views::View;

pub fn page() -> Outcome {
    Outcome::render(View::Login {
        username: String::new(),
    })
}

/// Check credentials and start a session.
///
/// Unknown usernames and wrong passwords both end in `InvalidCredentials`
/// with the same message, so the form never reveals which accounts exist.
pub async fn submit<S>(users: &S, sessions: &SessionKeys, form: LoginForm) -> Result<Outcome, TodoError>
where
    S: UserStore + ?Sized,
{
    match authenticate(users, &form).await {
        Ok(identity) => {
            let token = sessions.issue(&identity)?;
            tracing::info!("User {} logged in", identity.username);
            Ok(Outcome::sign_in(AFTER_LOGIN, sessions.cookie(token)))
        }
        Err(err) if err.is_recoverable() => {
            tracing::warn!("Failed login attempt for username {:?}", form.username.trim());
            Ok(Outcome::render_error(
                View::Login {
                    username: form.username.trim().to_string(),
                },
                err,
            ))
        }
        Err(err) => Err(err),
    }
}

async fn authenticate<S>(users: &S, form: &LoginForm) -> Result<Identity, TodoError>
where
    S: UserStore + ?Sized,
{
    let (username, password) = form.validate()?;

    let Some(user) = users.find_user_by_username(username).await? else {
        verify_password(password, None).await;
        return Err(TodoError::InvalidCredentials);
    };

    if !verify_password(password, Some(&user.password_hash)).await {
        return Err(TodoError::InvalidCredentials);
    }

    Ok(Identity {
        user_id: user.id,
        username: user.username,
    })
}

pub async fn get() -> Outcome {
    page()
}

pub async fn post(State(state): State<AppState>, cookies: Cookies, Form(form): Form<LoginForm>) -> Response {
    submit(&*state.store, &state.sessions, form)
        .await
        .unwrap_or_else(TodoError::into_outcome)
        .respond(&cookies)
}
