//! Signup, signin and session check.
//!
//! No HTTP here: handlers turn [`AuthError`] into status codes and bodies.

mod config;

pub use config::{AuthConfig, DEFAULT_FRONTEND_ORIGIN};

use crate::{
    password::{Hasher, PasswordError},
    store::{NewUser, Profile, StoreError, UserStore},
    token::{SessionTokens, TokenError, now_unix_seconds},
    validation,
};
use rand::{Rng, distributions::Alphanumeric};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid token")]
    InvalidToken(#[source] TokenError),
    #[error("email already registered")]
    Conflict,
    #[error("storage failure")]
    Storage(#[source] StoreError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            StoreError::Database(_) => Self::Storage(err),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// Successful signin.
#[derive(Debug)]
pub struct SignedIn {
    pub user_id: i64,
    pub token: String,
}

pub struct AuthService {
    config: AuthConfig,
    store: Arc<dyn UserStore>,
    hasher: Hasher,
    tokens: SessionTokens,
    // Verified against on lookup misses so unknown emails cost the same as wrong passwords.
    dummy_hash: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// # Errors
    /// Returns an error if the placeholder hash cannot be computed.
    pub fn new(
        config: AuthConfig,
        jwt_secret: &SecretString,
        store: Arc<dyn UserStore>,
        hasher: Hasher,
    ) -> Result<Self, AuthError> {
        let tokens = SessionTokens::new(jwt_secret, config.session_ttl_seconds());
        let placeholder: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let dummy_hash = hasher.hash(&placeholder)?;

        Ok(Self {
            config,
            store,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Create an account and return its id.
    ///
    /// # Errors
    /// `Validation` on bad input, `Conflict` if the email is taken, `Storage`
    /// on other database failures.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, AuthError> {
        validation::check_signup(username, email, password)
            .map_err(|message| AuthError::Validation(message.to_string()))?;

        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;
        let user = NewUser {
            username: username.trim().to_string(),
            email: validation::normalize_email(email),
            password_hash,
        };

        let user_id = self.store.insert_user(user).await?;
        info!(user_id, "account created");

        Ok(user_id)
    }

    /// Check credentials and issue a session token.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email, a wrong password or empty
    /// input; `Storage` on database failures.
    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let email = validation::normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let record = self.store.find_by_email(&email).await?;
        let stored_hash = record
            .as_ref()
            .map_or_else(|| self.dummy_hash.clone(), |user| user.password_hash.clone());

        let verified = self
            .hasher
            .verify_blocking(password.to_string(), stored_hash)
            .await?;

        let user = match record {
            Some(user) if verified => user,
            _ => {
                debug!("signin rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self
            .tokens
            .issue(user.id)
            .map_err(|err| AuthError::Unexpected(err.to_string()))?;
        info!(user_id = user.id, "signed in");

        Ok(SignedIn {
            user_id: user.id,
            token,
        })
    }

    /// Resolve a session token into the user's profile.
    ///
    /// # Errors
    /// `Unauthorized` without a token or when the user is gone,
    /// `InvalidToken` when verification fails.
    pub async fn session(&self, token: Option<&str>) -> Result<Profile, AuthError> {
        self.session_at(token, now_unix_seconds()).await
    }

    /// [`AuthService::session`] as if the current time were `now`.
    ///
    /// # Errors
    /// See [`AuthService::session`].
    pub async fn session_at(&self, token: Option<&str>, now: i64) -> Result<Profile, AuthError> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        let claims = self
            .tokens
            .verify_at(token, now)
            .map_err(AuthError::InvalidToken)?;
        let user_id = claims.user_id().map_err(AuthError::InvalidToken)?;

        self.store
            .find_profile(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}
