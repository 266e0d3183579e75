//! Input checks shared by the HTTP handlers and the client.
//!
//! The server is the authority; the client runs the same checks first so a
//! bad form never leaves the machine.

use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_USERNAME_LEN: usize = 64;

pub const MISSING_FIELDS: &str = "Missing fields";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const INVALID_USERNAME: &str = "Username must be at most 64 characters";
pub const WEAK_PASSWORD: &str =
    "Password must be at least 6 characters and contain an uppercase letter, a lowercase letter and a digit";

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Password policy: minimum length, upper, lower and digit, no whitespace.
/// Symbols are allowed but not required.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && !password.chars().any(char::is_whitespace)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Check a signup form, returning the message shown to the user on failure.
///
/// # Errors
/// Returns the first rule that the input breaks.
pub fn check_signup(username: &str, email: &str, password: &str) -> Result<(), &'static str> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(INVALID_USERNAME);
    }

    if !valid_email(email) {
        return Err(INVALID_EMAIL);
    }

    if !valid_password(password) {
        return Err(WEAK_PASSWORD);
    }

    Ok(())
}

/// Check a signin form. Only shape is checked here, never the password policy,
/// so accounts created under an older policy can still sign in.
///
/// # Errors
/// Returns the first rule that the input breaks.
pub fn check_signin(email: &str, password: &str) -> Result<(), &'static str> {
    let email = email.trim();

    if email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }

    if !valid_email(email) {
        return Err(INVALID_EMAIL);
    }

    Ok(())
}
