use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use super::{require, resolve_id, PENDING_LIST};
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::TodoStore;
use crate::error::TodoError;
use crate::middleware::{CurrentIdentity, Outcome};

/// Mark one of the caller's todos completed now. Completing again just moves
/// the timestamp; there is no way back to open.
pub async fn submit<S>(todos: &S, identity: Option<&Identity>, id: Uuid) -> Result<Outcome, TodoError>
where
    S: TodoStore + ?Sized,
{
    let identity = require(identity)?;
    todos
        .complete_todo(identity.user_id, id, Utc::now())
        .await?
        .ok_or(TodoError::NotFound)?;
    Ok(Outcome::redirect(PENDING_LIST))
}

pub async fn post(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(raw_id): Path<String>,
) -> Response {
    let result = match resolve_id(identity.as_ref(), &raw_id) {
        Ok(id) => submit(&*state.store, identity.as_ref(), id).await,
        Err(e) => Err(e),
    };
    result.into_response()
}
