use super::{NewUser, Profile, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process user table with the same uniqueness rule as the database.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict);
        }

        let id = users.last().map_or(1, |last| last.id + 1);
        users.push(UserRecord {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        });

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_profile(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|user| user.id == id)
            .map(UserRecord::profile))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.insert_user(new_user("a", "a@x.com")).await.unwrap(), 1);
        assert_eq!(store.insert_user(new_user("b", "b@x.com")).await.unwrap(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.insert_user(new_user("a", "a@x.com")).await.unwrap();
        let err = store.insert_user(new_user("other", "a@x.com")).await;
        assert!(matches!(err, Err(StoreError::Conflict)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_username_allowed() {
        let store = MemoryUserStore::new();
        store.insert_user(new_user("a", "a@x.com")).await.unwrap();
        assert!(store.insert_user(new_user("a", "b@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn lookups() {
        let store = MemoryUserStore::new();
        let id = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();

        let record = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.password_hash, "hash");
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());

        let profile = store.find_profile(id).await.unwrap().unwrap();
        assert_eq!(
            profile,
            Profile {
                id,
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            }
        );
        assert!(store.find_profile(id + 1).await.unwrap().is_none());
        assert!(store.ping().await.is_ok());
    }
}
