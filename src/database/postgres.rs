use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Todo, TodoInput, User};
use crate::database::store::{Store, TodoStore, UserStore};

const TODO_COLUMNS: &str = "id, user_id, title, memo, important, created_at, completed_at";

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store. Each operation is a single owner-scoped statement
/// (or one transaction for edits), so concurrent requests never see a
/// half-applied change.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(DatabaseError::Duplicate("username"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn insert_todo(&self, owner: Uuid, input: &TodoInput) -> Result<Todo, DatabaseError> {
        let sql = format!(
            "INSERT INTO todos (id, user_id, title, memo, important) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {TODO_COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(&input.title)
            .bind(&input.memo)
            .bind(input.important)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn find_todo(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND user_id = $2");
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn list_pending(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 AND completed_at IS NULL \
             ORDER BY created_at ASC"
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn list_completed(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 AND completed_at IS NOT NULL \
             ORDER BY completed_at DESC, created_at DESC"
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn update_todo(&self, owner: Uuid, id: Uuid, input: &TodoInput) -> Result<Option<Todo>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Lock the owned row so a concurrent delete/complete waits for this edit
        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM todos WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let sql = format!(
            "UPDATE todos SET title = $3, memo = $4, important = $5 \
             WHERE id = $1 AND user_id = $2 RETURNING {TODO_COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&input.title)
            .bind(&input.memo)
            .bind(input.important)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(todo))
    }

    async fn complete_todo(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            "UPDATE todos SET completed_at = $3 WHERE id = $1 AND user_id = $2 RETURNING {TODO_COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn delete_todo(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
