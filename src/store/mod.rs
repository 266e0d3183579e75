//! Credential store: the `users` table behind an async trait.
//!
//! `PgUserStore` is the production backend. `MemoryUserStore` keeps the same
//! uniqueness rules in process and backs tests and `--dsn memory://`.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Short code safe to show to clients (SQLSTATE when available).
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Conflict => UNIQUE_VIOLATION.to_string(),
            Self::Database(sqlx::Error::Database(db_err)) => db_err
                .code()
                .map_or_else(|| "UNKNOWN".to_string(), |code| code.into_owned()),
            Self::Database(sqlx::Error::PoolTimedOut) => "POOL_TIMEOUT".to_string(),
            Self::Database(sqlx::Error::PoolClosed) => "POOL_CLOSED".to_string(),
            Self::Database(sqlx::Error::Io(_)) => "IO".to_string(),
            Self::Database(_) => "UNKNOWN".to_string(),
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.as_ref() == UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Row to insert on signup. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Full row, including the hash. Never serialized.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRecord {
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public projection of a user.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return its id.
    ///
    /// Returns [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<i64, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_profile(&self, id: i64) -> Result<Option<Profile>, StoreError>;

    /// Round trip to the backend, used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backend resources on shutdown.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("42P01"),
        }));
        assert!(!is_unique_violation(&err));

        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn code_exposes_sqlstate_only() {
        let err = StoreError::Database(sqlx::Error::Database(Box::new(TestDbError {
            code: Some("42P01"),
        })));
        assert_eq!(err.code(), "42P01");

        let err = StoreError::Database(sqlx::Error::Database(Box::new(TestDbError {
            code: None,
        })));
        assert_eq!(err.code(), "UNKNOWN");

        assert_eq!(StoreError::Database(sqlx::Error::PoolTimedOut).code(), "POOL_TIMEOUT");
        assert_eq!(StoreError::Conflict.code(), "23505");
    }

    #[test]
    fn profile_drops_hash() {
        let record = UserRecord {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };
        let profile = record.profile();
        assert_eq!(profile.id, 1);
        let json = serde_json::to_string(&profile).unwrap_or_default();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"alice\""));
    }
}
