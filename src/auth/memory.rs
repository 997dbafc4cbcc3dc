//! In-memory `UserRepository` used by unit and router tests.
//!
//! Enforces the same unique constraints as the `users` table and counts calls
//! so tests can assert whether a use case touched the store at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo::{conflict_for_constraint, UserRepository};
use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
    calls: AtomicUsize,
    fail: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails like an unreachable database.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Seeds a record directly, bypassing call counting.
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    fn enter(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Infrastructure(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn check_unique(map: &HashMap<Uuid, User>, user: &User) -> AppResult<()> {
        for other in map.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(conflict_for_constraint(Some("users_username_key")));
            }
            if other.email == user.email {
                return Err(conflict_for_constraint(Some("users_email_key")));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.enter()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.enter()?;
        let map = self.users.lock().unwrap();
        Ok(map.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.enter()?;
        let map = self.users.lock().unwrap();
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        self.enter()?;
        let mut map = self.users.lock().unwrap();
        if map.contains_key(&user.id) {
            return Err(conflict_for_constraint(Some("users_pkey")));
        }
        Self::check_unique(&map, user)?;
        map.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        self.enter()?;
        let mut map = self.users.lock().unwrap();
        if !map.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found for update.".into()));
        }
        Self::check_unique(&map, user)?;
        map.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        self.enter()?;
        let mut map = self.users.lock().unwrap();
        match map.get_mut(&id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: "hash".into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            address: "Somewhere 1".into(),
            gender: "other".into(),
            age: Some(30),
            date_of_birth: None,
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn update_overwrites_existing_and_rejects_missing() {
        let repo = InMemoryUserRepository::new();
        let mut u = repo.save(&user("a", "a@x.com")).await.expect("save");
        u.first_name = "Changed".into();
        let updated = repo.update(&u).await.expect("update");
        assert_eq!(updated.first_name, "Changed");

        let ghost = user("ghost", "ghost@x.com");
        assert!(matches!(repo.update(&ghost).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_cannot_steal_another_users_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(&user("a", "a@x.com")).await.expect("save a");
        let mut b = repo.save(&user("b", "b@x.com")).await.expect("save b");
        b.email = "a@x.com".into();
        assert!(matches!(repo.update(&b).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_password_reports_affected_rows() {
        let repo = InMemoryUserRepository::new();
        let u = repo.save(&user("a", "a@x.com")).await.expect("save");
        assert!(repo.update_password(u.id, "new").await.expect("update"));
        assert_eq!(repo.get(u.id).expect("present").password_hash, "new");
        assert!(!repo.update_password(Uuid::new_v4(), "new").await.expect("update"));
    }
}
