use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::middleware::response::Outcome;
use crate::views::View;

/// Everything a request can fail with. None of these outlive the request:
/// each maps to a redirect or a rendered page.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Missing or malformed form field
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Username already exists.")]
    DuplicateUsername,

    #[error("Passwords did not match.")]
    PasswordMismatch,

    // Deliberately the same for unknown user and wrong password
    #[error("Username and password did not match.")]
    InvalidCredentials,

    #[error("Page not found.")]
    NotFound,

    #[error("Please log in to continue.")]
    Unauthorized,

    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl TodoError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TodoError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors the user can fix by resubmitting the form
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TodoError::Validation { .. }
                | TodoError::DuplicateUsername
                | TodoError::PasswordMismatch
                | TodoError::InvalidCredentials
        )
    }

    /// Message safe to show to the user. Internal failures stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            TodoError::Database(_) | TodoError::Auth(_) => {
                "Something went wrong while processing your request.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Request-scope fallback for errors a handler did not turn into a form re-render
    pub fn into_outcome(self) -> Outcome {
        match self {
            TodoError::Unauthorized => Outcome::redirect("/login"),
            TodoError::NotFound => Outcome::not_found(),
            TodoError::MethodNotAllowed => Outcome::method_not_allowed(),
            err @ (TodoError::Database(_) | TodoError::Auth(_)) => {
                // Log the real error, show a generic page
                tracing::error!("Request failed: {}", err);
                Outcome::server_error(err)
            }
            other => Outcome::render_error(View::Home { username: None }, other),
        }
    }
}

impl From<crate::forms::FieldError> for TodoError {
    fn from(err: crate::forms::FieldError) -> Self {
        TodoError::Validation {
            field: err.field,
            reason: err.reason,
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        self.into_outcome().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn credential_errors_do_not_leak_which_part_failed() {
        assert_eq!(
            TodoError::InvalidCredentials.to_string(),
            "Username and password did not match."
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = TodoError::Database(DatabaseError::ConfigMissing("DATABASE_URL"));
        assert!(!err.user_message().contains("DATABASE_URL"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        match TodoError::Unauthorized.into_outcome() {
            Outcome::Redirect { target, .. } => assert_eq!(target, "/login"),
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn not_found_renders_404() {
        let response = TodoError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn method_not_allowed_renders_405() {
        let response = TodoError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
