use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use uuid::Uuid;

use super::{require, resolve_id, PENDING_LIST};
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::TodoStore;
use crate::error::TodoError;
use crate::forms::TodoForm;
use crate::middleware::{CurrentIdentity, Outcome};
use crate::views::View;

/// Show one of the caller's todos with its edit form
pub async fn show<S>(todos: &S, identity: Option<&Identity>, id: Uuid) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;
    let todo = todos
        .find_todo(identity.user_id, id)
        .await?
        .ok_or(TodoError::NotFound)?;

    let form = TodoForm::from_todo(&todo);
    Ok(Outcome::render(View::TodoDetail { todo, form }))
}

/// Apply an edit to title, memo and importance. Completion state and
/// timestamps are never touched here.
pub async fn submit<S>(todos: &S, identity: Option<&Identity>, id: Uuid, form: TodoForm) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(err) => {
            // Re-render needs the stored record, and that lookup is also the ownership check
            let todo = todos
                .find_todo(identity.user_id, id)
                .await?
                .ok_or(TodoError::NotFound)?;
            return Ok(Outcome::render_error(View::TodoDetail { todo, form }, err.into()));
        }
    };

    todos
        .update_todo(identity.user_id, id, &input)
        .await?
        .ok_or(TodoError::NotFound)?;
    Ok(Outcome::redirect(PENDING_LIST))
}

pub async fn get(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(raw_id): Path<String>,
) -> Response {
    let result = match resolve_id(identity.as_ref(), &raw_id) {
        Ok(id) => show(&*state.store, identity.as_ref(), id).await,
        Err(e) => Err(e),
    };
    result.into_response()
}

pub async fn post(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(raw_id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Response {
    let result = match resolve_id(identity.as_ref(), &raw_id) {
        Ok(id) => submit(&*state.store, identity.as_ref(), id, form).await,
        Err(e) => Err(e),
    };
    result.into_response()
}
