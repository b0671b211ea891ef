use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_cookies::{Cookie, Cookies};

use crate::auth::SESSION_COOKIE;
use crate::error::TodoError;
use crate::views::View;

/// What a successful redirect does to the session cookie
#[derive(Debug)]
pub enum SessionChange {
    Keep,
    Start(Cookie<'static>),
    End,
}

/// Result of a handler: either go somewhere else or show a page.
#[derive(Debug)]
pub enum Outcome {
    Redirect {
        target: String,
        session: SessionChange,
    },
    Render {
        view: View,
        error: Option<TodoError>,
        status: StatusCode,
    },
}

impl Outcome {
    pub fn redirect(target: impl Into<String>) -> Self {
        Outcome::Redirect {
            target: target.into(),
            session: SessionChange::Keep,
        }
    }

    /// Redirect and attach a freshly issued session cookie
    pub fn sign_in(target: impl Into<String>, cookie: Cookie<'static>) -> Self {
        Outcome::Redirect {
            target: target.into(),
            session: SessionChange::Start(cookie),
        }
    }

    pub fn sign_out(target: impl Into<String>) -> Self {
        Outcome::Redirect {
            target: target.into(),
            session: SessionChange::End,
        }
    }

    pub fn render(view: View) -> Self {
        Outcome::Render {
            view,
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Re-render a form with the error that stopped it
    pub fn render_error(view: View, error: TodoError) -> Self {
        Outcome::Render {
            view,
            error: Some(error),
            status: StatusCode::OK,
        }
    }

    pub fn not_found() -> Self {
        Outcome::Render {
            view: View::NotFound,
            error: None,
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn method_not_allowed() -> Self {
        Outcome::Render {
            view: View::MethodNotAllowed,
            error: None,
            status: StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn server_error(error: TodoError) -> Self {
        Outcome::Render {
            view: View::ServerError,
            error: Some(error),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error carried by a rendered page, if any
    pub fn error(&self) -> Option<&TodoError> {
        match self {
            Outcome::Render { error, .. } => error.as_ref(),
            Outcome::Redirect { .. } => None,
        }
    }

    /// Apply any session change to the cookie jar, then build the response
    pub fn respond(self, cookies: &Cookies) -> Response {
        if let Outcome::Redirect { session, .. } = &self {
            match session {
                SessionChange::Keep => {}
                SessionChange::Start(cookie) => cookies.add(cookie.clone()),
                SessionChange::End => {
                    let mut cookie = Cookie::new(SESSION_COOKIE, "");
                    cookie.set_path("/");
                    cookies.remove(cookie);
                }
            }
        }
        self.into_response()
    }
}

/// Converts without touching cookies; use `respond` when the session may change.
impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            // 303 See Other, so a POST is followed by a GET
            Outcome::Redirect { target, .. } => Redirect::to(&target).into_response(),
            Outcome::Render {
                view,
                error,
                status,
            } => {
                let message = error.as_ref().map(TodoError::user_message);
                (status, Html(view.render(message.as_deref()))).into_response()
            }
        }
    }
}
