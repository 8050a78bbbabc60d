/// In-memory repositories
///
/// Deterministic stand-ins for the PostgreSQL repositories. IDs are allocated
/// sequentially from 1, so tasks come back in insertion order. State lives
/// behind a `tokio::sync::RwLock`; each operation holds the lock for its
/// whole read-modify-write.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskRepository, UserRepository};
use crate::models::task::{NewTask, Task, TaskStatus};
use crate::models::user::{NewUser, User};
use crate::tasks::filter::TaskFilter;

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Task repository backed by a map
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    table: RwLock<Table<Task>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether no tasks are stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, owner_id: i64, task: NewTask) -> StoreResult<Task> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let now = Utc::now();

        let task = Task {
            id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Open,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, task.clone());

        Ok(task)
    }

    async fn find_by_id_and_owner(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .get(&id)
            .filter(|task| task.is_owned_by(owner_id))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: i64, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .filter(|task| filter.matches(owner_id, task))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: i64,
        owner_id: i64,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        let mut table = self.table.write().await;

        Ok(table
            .rows
            .get_mut(&id)
            .filter(|task| task.is_owned_by(owner_id))
            .map(|task| {
                task.status = status;
                task.updated_at = Utc::now();
                task.clone()
            }))
    }

    async fn delete_by_id_and_owner(&self, id: i64, owner_id: i64) -> StoreResult<bool> {
        let mut table = self.table.write().await;

        let owned = table
            .rows
            .get(&id)
            .is_some_and(|task| task.is_owned_by(owner_id));
        if owned {
            table.rows.remove(&id);
        }

        Ok(owned)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// User repository backed by a map
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }

        let id = table.allocate_id();
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            salt: user.salt,
            created_at: Utc::now(),
        };
        table.rows.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let table = self.table.read().await;

        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: format!("{} description", title),
        }
    }

    #[tokio::test]
    async fn test_insert_allocates_sequential_ids_and_open_status() {
        let repo = InMemoryTaskRepository::new();

        let first = repo.insert(1, new_task("first")).await.unwrap();
        let second = repo.insert(2, new_task("second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, TaskStatus::Open);
        assert_eq!(second.user_id, 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_is_owner_scoped() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.insert(1, new_task("mine")).await.unwrap();

        assert_eq!(repo.find_by_id_and_owner(task.id, 1).await.unwrap(), Some(task.clone()));
        assert_eq!(repo.find_by_id_and_owner(task.id, 2).await.unwrap(), None);
        assert_eq!(repo.find_by_id_and_owner(99, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let repo = InMemoryTaskRepository::new();
        for title in ["a", "b", "c"] {
            repo.insert(1, new_task(title)).await.unwrap();
        }
        repo.insert(2, new_task("other")).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_owner(1, &TaskFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_status_is_owner_scoped() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.insert(1, new_task("t")).await.unwrap();

        assert!(repo.update_status(task.id, 2, TaskStatus::Done).await.unwrap().is_none());

        let updated = repo.update_status(task.id, 1, TaskStatus::Done).await.unwrap().unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped_and_not_repeatable() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.insert(1, new_task("t")).await.unwrap();

        assert!(!repo.delete_by_id_and_owner(task.id, 2).await.unwrap());
        assert!(repo.delete_by_id_and_owner(task.id, 1).await.unwrap());
        assert!(!repo.delete_by_id_and_owner(task.id, 1).await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_user_username_is_unique() {
        let repo = InMemoryUserRepository::new();
        let new_user = NewUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
        };

        let alice = repo.insert(new_user.clone()).await.unwrap();
        assert_eq!(alice.id, 1);

        let duplicate = repo.insert(new_user).await;
        assert!(matches!(duplicate, Err(StoreError::UniqueViolation(_))));

        assert_eq!(repo.find_by_username("alice").await.unwrap(), Some(alice.clone()));
        assert_eq!(repo.find_by_id(alice.id).await.unwrap(), Some(alice));
        assert_eq!(repo.find_by_username("bob").await.unwrap(), None);
    }
}
