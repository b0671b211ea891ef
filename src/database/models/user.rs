use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account record. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
