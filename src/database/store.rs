use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, TodoInput, User};

/// Account storage. Credential checks happen in `crate::auth` on top of this.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}

/// Todo storage. Every lookup and mutation is owner-scoped: a record is only
/// reachable through the `(owner, id)` pair, never by id alone.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, owner: Uuid, input: &TodoInput) -> Result<Todo, DatabaseError>;

    async fn find_todo(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError>;

    /// Open todos, oldest first.
    async fn list_pending(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError>;

    /// Completed todos, most recently completed first.
    async fn list_completed(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError>;

    /// Replaces title, memo and importance. `None` when no such owned todo exists.
    async fn update_todo(&self, owner: Uuid, id: Uuid, input: &TodoInput) -> Result<Option<Todo>, DatabaseError>;

    /// Sets `completed_at`, overwriting any earlier completion time.
    async fn complete_todo(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<Option<Todo>, DatabaseError>;

    /// Returns whether a record was removed.
    async fn delete_todo(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Everything the web layer needs from a backend.
#[async_trait]
pub trait Store: UserStore + TodoStore {
    async fn ping(&self) -> Result<(), DatabaseError>;
}
