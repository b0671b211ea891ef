use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use super::require;
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::TodoStore;
use crate::error::TodoError;
use crate::middleware::{CurrentIdentity, Outcome};
use crate::views::View;

/// The caller's open todos, oldest first
pub async fn pending<S>(todos: &S, identity: Option<&Identity>) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;
    let todos = todos.list_pending(identity.user_id).await?;
    Ok(Outcome::render(View::Pending { todos }))
}

/// The caller's completed todos, most recently completed first
pub async fn completed<S>(todos: &S, identity: Option<&Identity>) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;
    let todos = todos.list_completed(identity.user_id).await?;
    Ok(Outcome::render(View::Completed { todos }))
}

pub async fn pending_get(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> Response {
    pending(&*state.store, identity.as_ref()).await.into_response()
}

pub async fn completed_get(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> Response {
    completed(&*state.store, identity.as_ref()).await.into_response()
}
