//! In-memory credential store
//!
//! Mirrors the Postgres semantics (unique ids, upsert overwrite, expired
//! session records invisible, cascade on user delete) so services and routes
//! can be exercised without a database.

use super::{CredentialStore, StoreError, UserCredentials, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredUser {
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SessionRecord {
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, StoredUser>,
    sessions: HashMap<i64, SessionRecord>,
}

/// Mutex-guarded [`CredentialStore`]
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tables: Mutex<Tables>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of session records, expired ones included
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().filter(|u| u.email == email).count() as i64)
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<i64, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.next_id += 1;
        let id = tables.next_id;
        tables.users.insert(
            id,
            StoredUser {
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|(_, u)| u.email == email)
            .map(|(id, u)| UserCredentials {
                id: *id,
                email: u.email.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).map(|u| UserRecord {
            id,
            email: u.email.clone(),
            created_at: u.created_at,
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.users.remove(&id);
        tables.sessions.remove(&id);
        Ok(())
    }

    async fn upsert_session_token(
        &self,
        user_id: i64,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.sessions.insert(
            user_id,
            SessionRecord {
                refresh_token: refresh_token.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn fetch_session_token(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        let tables = self.tables.lock().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .get(&user_id)
            .filter(|s| s.expires_at > now)
            .map(|s| s.refresh_token.clone()))
    }

    async fn delete_session_token(&self, user_id: i64) -> Result<(), StoreError> {
        self.tables.lock().await.sessions.remove(&user_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let store = MemoryCredentialStore::new();
        let id = store.insert_user("a@x.com", "hash").await.unwrap();

        assert_eq!(store.count_by_email("a@x.com").await.unwrap(), 1);
        assert_eq!(store.count_by_email("b@x.com").await.unwrap(), 0);

        let creds = store.fetch_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(creds.id, id);
        assert_eq!(creds.password_hash, "hash");

        let record = store.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.email, "a@x.com");
        assert!(store.fetch_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_previous_token() {
        let store = MemoryCredentialStore::new();
        let expires = Utc::now() + Duration::hours(1);

        store.upsert_session_token(1, "first", expires).await.unwrap();
        store.upsert_session_token(1, "second", expires).await.unwrap();

        assert_eq!(store.fetch_session_token(1).await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_invisible() {
        let store = MemoryCredentialStore::new();
        store
            .upsert_session_token(1, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(store.fetch_session_token(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_session() {
        let store = MemoryCredentialStore::new();
        let id = store.insert_user("a@x.com", "hash").await.unwrap();
        store
            .upsert_session_token(id, "tok", Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        store.delete_by_id(id).await.unwrap();

        assert!(store.fetch_by_id(id).await.unwrap().is_none());
        assert!(store.fetch_session_token(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_session_is_ok() {
        let store = MemoryCredentialStore::new();
        assert!(store.delete_session_token(99).await.is_ok());
    }
}
