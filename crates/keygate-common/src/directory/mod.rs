//! Principal directory
//!
//! Resolves a username into a stored principal. The token service never
//! touches this layer; the request gate and the login flow do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A stored identity record
///
/// The password hash is consumed only by the login flow; it is never
/// serialized into responses or embedded into tokens.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Create a new principal with a fresh id
    #[must_use]
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Lookup and storage interface for principals
///
/// One narrow seam so the backing store can be swapped without touching the
/// gate or the login flow.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a principal by username, `None` when absent
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Principal>>;

    /// Insert a new principal
    ///
    /// # Errors
    /// Returns `AppError::AlreadyExists` if the username is taken
    async fn insert(&self, principal: Principal) -> AppResult<()>;
}

/// In-memory directory backed by a concurrent map
///
/// The reference adapter used by the server binary and the test suite.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: DashMap<String, Principal>,
}

impl MemoryDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Principal>> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, principal: Principal) -> AppResult<()> {
        use dashmap::mapref::entry::Entry;

        match self.users.entry(principal.username.clone()) {
            Entry::Occupied(_) => {
                Err(AppError::AlreadyExists(format!("user {}", principal.username)))
            }
            Entry::Vacant(entry) => {
                entry.insert(principal);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let directory = MemoryDirectory::new();
        let principal = Principal::new("alice".to_string(), "hash".to_string());
        let id = principal.id;

        directory.insert(principal).await.unwrap();

        let found = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let directory = MemoryDirectory::new();

        assert!(directory.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let directory = MemoryDirectory::new();

        directory
            .insert(Principal::new("alice".to_string(), "hash".to_string()))
            .await
            .unwrap();
        let result = directory
            .insert(Principal::new("alice".to_string(), "other".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let principal = Principal::new("alice".to_string(), "secret-hash".to_string());
        let json = serde_json::to_string(&principal).unwrap();

        assert!(!json.contains("secret-hash"));
        assert!(json.contains("alice"));
    }
}
