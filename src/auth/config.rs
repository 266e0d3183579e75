//! Runtime settings for the auth service and its cookie.

use crate::token::DEFAULT_SESSION_TTL_SECONDS;

pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_origin: String,
    session_ttl_seconds: i64,
    cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FRONTEND_ORIGIN.to_string())
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_origin: String) -> Self {
        Self {
            frontend_origin,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    /// Mark the session cookie `Secure`. Only enable when served over HTTPS.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn frontend_origin(&self) -> &str {
        &self.frontend_origin
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.frontend_origin(), "http://localhost:5173");
        assert_eq!(config.session_ttl_seconds(), 7200);
        assert!(!config.cookie_secure());
    }

    #[test]
    fn builder_overrides() {
        let config = AuthConfig::new("https://app.sesame.dev".to_string())
            .with_session_ttl_seconds(60)
            .with_cookie_secure(true);
        assert_eq!(config.frontend_origin(), "https://app.sesame.dev");
        assert_eq!(config.session_ttl_seconds(), 60);
        assert!(config.cookie_secure());
    }
}
