use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Todo, TodoInput, User};
use crate::database::store::{Store, TodoStore, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order doubles as creation order
    todos: Vec<Todo>,
}

/// In-process store used by tests and `serve --memory`.
///
/// Every operation holds the lock for its whole read-then-write, which gives
/// the same all-or-nothing behaviour the SQL backend gets from statements and
/// transactions.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(DatabaseError::Duplicate("username"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, owner: Uuid, input: &TodoInput) -> Result<Todo, DatabaseError> {
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: owner,
            title: input.title.clone(),
            memo: input.memo.clone(),
            important: input.important,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.tables.write().await.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, owner: Uuid, id: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned())
    }

    async fn list_pending(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| t.user_id == owner && !t.is_completed())
            .cloned()
            .collect())
    }

    async fn list_completed(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut todos: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|t| t.user_id == owner && t.is_completed())
            .cloned()
            .collect();
        todos.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(todos)
    }

    async fn update_todo(&self, owner: Uuid, id: Uuid, input: &TodoInput) -> Result<Option<Todo>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(todo) = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
        else {
            return Ok(None);
        };

        todo.title = input.title.clone();
        todo.memo = input.memo.clone();
        todo.important = input.important;
        Ok(Some(todo.clone()))
    }

    async fn complete_todo(&self, owner: Uuid, id: Uuid, at: DateTime<Utc>) -> Result<Option<Todo>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(todo) = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
        else {
            return Ok(None);
        };

        todo.completed_at = Some(at);
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tables.todos.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            memo: String::new(),
            important: false,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_username() {
        let store = MemoryStore::new();
        store.create_user("alice", "hash").await.unwrap();

        let err = store.create_user("alice", "other").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate("username")));
        assert_eq!(store.tables.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn lookups_are_owner_scoped() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let todo = store.insert_todo(alice, &input("buy milk")).await.unwrap();

        assert!(store.find_todo(bob, todo.id).await.unwrap().is_none());
        assert!(store.update_todo(bob, todo.id, &input("hijacked")).await.unwrap().is_none());
        assert!(store.complete_todo(bob, todo.id, Utc::now()).await.unwrap().is_none());
        assert!(!store.delete_todo(bob, todo.id).await.unwrap());
        assert!(store.list_pending(bob).await.unwrap().is_empty());

        let unchanged = store.find_todo(alice, todo.id).await.unwrap().unwrap();
        assert_eq!(unchanged, todo);
    }

    #[tokio::test]
    async fn pending_keeps_insertion_order() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            store.insert_todo(owner, &input(title)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_pending(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn completed_is_most_recent_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let t0 = Utc::now();
        let a = store.insert_todo(owner, &input("a")).await.unwrap();
        let b = store.insert_todo(owner, &input("b")).await.unwrap();
        let c = store.insert_todo(owner, &input("c")).await.unwrap();

        // Completed out of insertion order: b at t1, c at t2, a at t3
        store.complete_todo(owner, b.id, t0 + Duration::seconds(1)).await.unwrap();
        store.complete_todo(owner, c.id, t0 + Duration::seconds(2)).await.unwrap();
        store.complete_todo(owner, a.id, t0 + Duration::seconds(3)).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_completed(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [a.id, c.id, b.id]);
        assert!(store.list_pending(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_ties_break_newest_created_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let older = store.insert_todo(owner, &input("older")).await.unwrap();
        let newer = store.insert_todo(owner, &input("newer")).await.unwrap();
        {
            let mut tables = store.tables.write().await;
            let base = Utc::now();
            tables.todos[0].created_at = base;
            tables.todos[1].created_at = base + Duration::seconds(1);
        }

        let at = Utc::now();
        store.complete_todo(owner, older.id, at).await.unwrap();
        store.complete_todo(owner, newer.id, at).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_completed(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [newer.id, older.id]);
    }

    #[tokio::test]
    async fn finds_user_by_id() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice", "hash").await.unwrap();

        let found = store.get_user(alice.id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(store.get_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn completing_twice_overwrites_timestamp() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let todo = store.insert_todo(owner, &input("a")).await.unwrap();
        let first = Utc::now();
        let second = first + Duration::minutes(5);

        store.complete_todo(owner, todo.id, first).await.unwrap();
        let again = store.complete_todo(owner, todo.id, second).await.unwrap().unwrap();
        assert_eq!(again.completed_at, Some(second));
    }

    #[tokio::test]
    async fn edit_keeps_completion_state() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let todo = store.insert_todo(owner, &input("a")).await.unwrap();
        let at = Utc::now();
        store.complete_todo(owner, todo.id, at).await.unwrap();

        let edited = store
            .update_todo(owner, todo.id, &input("renamed"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.title, "renamed");
        assert_eq!(edited.completed_at, Some(at));
        assert_eq!(edited.created_at, todo.created_at);
    }
}
