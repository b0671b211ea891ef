// handlers/protected/todos/mod.rs - todo CRUD
//
//   GET       /todos                 pending list
//   GET       /todos/completed       completed list
//   GET|POST  /todos/create          create
//   GET|POST  /todos/:id             view / edit
//   POST      /todos/:id/complete    mark complete
//   POST      /todos/:id/delete      delete

pub mod complete;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;

pub use complete::post as complete_post;
pub use create::{get as create_get, post as create_post};
pub use delete::post as delete_post;
pub use detail::{get as detail_get, post as detail_post};
pub use list::{completed_get, pending_get};

use uuid::Uuid;

use crate::auth::Identity;
use crate::error::TodoError;

/// Where todo mutations land
pub const PENDING_LIST: &str = "/todos";

/// The identity a protected operation acts as, or `Unauthorized`
pub fn require(identity: Option<&Identity>) -> Result<&Identity, TodoError> {
    identity.ok_or(TodoError::Unauthorized)
}

/// Path id for a protected route. The session is checked first so anonymous
/// callers go to login instead of seeing a not-found page.
pub fn resolve_id(identity: Option<&Identity>, raw: &str) -> Result<Uuid, TodoError> {
    require(identity)?;
    parse_id(raw)
}

/// Ids that are not UUIDs cannot name a todo, so they are simply not found
pub fn parse_id(raw: &str) -> Result<Uuid, TodoError> {
    Uuid::parse_str(raw).map_err(|_| TodoError::NotFound)
}
