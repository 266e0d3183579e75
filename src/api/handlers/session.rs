//! Session cookie helpers.

use crate::auth::AuthConfig;
use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};

pub const SESSION_COOKIE_NAME: &str = "token";

/// Build the `HttpOnly` cookie carrying the session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string(
        config,
        token,
        config.session_ttl_seconds(),
    ))
}

/// Build a cookie that deletes the session cookie.
///
/// Browsers only drop a cookie when `Path`, `SameSite` and `Secure` match the
/// ones it was set with, so both go through [`cookie_string`].
pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string(config, "", 0))
}

fn cookie_string(config: &AuthConfig, value: &str, max_age: i64) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read the session token from the request cookies, if any.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty())
                .then(|| val.trim().to_string())
        })
}
