//! # Sesame (username/password authentication)
//!
//! `sesame` is a small authentication service: users sign up with a username,
//! email and password, sign in to receive a session cookie, check the session
//! and log out.
//!
//! ## Credentials
//!
//! Passwords are hashed with **Argon2id** and stored in PHC string format. The
//! plaintext never reaches the database. Hashing runs on the blocking thread
//! pool so concurrent requests are not stalled behind it.
//!
//! ## Sessions
//!
//! A successful signin issues an HS256 JWT carrying the user id, valid for two
//! hours by default, delivered in an `HttpOnly` cookie named `token`. Sessions
//! are stateless: nothing is stored server-side and a token stays valid until
//! it expires. Logout clears the cookie with the exact attributes used to set
//! it, otherwise browsers keep it.
//!
//! ## Enumeration
//!
//! Signin returns the same `401 Invalid credentials` for an unknown email and
//! a wrong password, and runs a hash verification in both cases.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod password;
pub mod store;
pub mod token;
pub mod validation;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
