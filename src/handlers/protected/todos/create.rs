use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};

use super::{require, PENDING_LIST};
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::TodoStore;
use crate::error::TodoError;
use crate::forms::TodoForm;
use crate::middleware::{CurrentIdentity, Outcome};
use crate::views::View;

pub fn page(identity: Option<&Identity>) -> Result<Outcome, TodoError> {
    require(identity)?;
    Ok(Outcome::render(View::CreateTodo {
        form: TodoForm::default(),
    }))
}

/// Persist a new todo owned by the caller. An invalid form comes back with
/// everything the user typed still filled in.
pub async fn submit<S>(todos: &S, identity: Option<&Identity>, form: TodoForm) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(err) => return Ok(Outcome::render_error(View::CreateTodo { form }, err.into())),
    };

    let todo = todos.insert_todo(identity.user_id, &input).await?;
    tracing::debug!("User {} created todo {}", identity.username, todo.id);
    Ok(Outcome::redirect(PENDING_LIST))
}

pub async fn get(CurrentIdentity(identity): CurrentIdentity) -> Response {
    page(identity.as_ref()).into_response()
}

pub async fn post(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Form(form): Form<TodoForm>,
) -> Response {
    submit(&*state.store, identity.as_ref(), form).await.into_response()
}
