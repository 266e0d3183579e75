//! HTTP client for the auth API.
//!
//! Runs the same input checks as the server before sending anything, and
//! keeps the session token in a [`SessionFile`] between invocations.

mod session_file;

pub use session_file::SessionFile;

use crate::{
    APP_USER_AGENT,
    api::{
        handlers::session::SESSION_COOKIE_NAME,
        types::{ErrorResponse, MessageResponse, SigninRequest, SignupRequest},
    },
    store::Profile,
    validation,
};
use reqwest::{
    Response, StatusCode,
    header::{COOKIE, SET_COOKIE},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },
    #[error("response did not set a session cookie")]
    MissingCookie,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("session file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct AuthClient {
    base_url: Url,
    http: reqwest::Client,
}

impl AuthClient {
    /// # Errors
    /// Returns an error if `base_url` does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: Url::parse(base_url)?,
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Create an account.
    ///
    /// # Errors
    /// `Validation` before any request if the form is invalid, `Api` when the
    /// server rejects it.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<MessageResponse, ClientError> {
        validation::check_signup(username, email, password).map_err(ClientError::Validation)?;

        let request = SignupRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("/api/signup")?)
            .json(&request)
            .send()
            .await?;

        json_or_error(response).await
    }

    /// Sign in and return the session token from the `Set-Cookie` header.
    ///
    /// # Errors
    /// `Validation` before any request if the form is invalid, `Api` on
    /// rejected credentials, `MissingCookie` if the server set no token.
    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, ClientError> {
        validation::check_signin(email, password).map_err(ClientError::Validation)?;

        let request = SigninRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("/api/signin")?)
            .json(&request)
            .send()
            .await?;

        let token = session_token(&response);
        let _: MessageResponse = json_or_error(response).await?;

        token.ok_or(ClientError::MissingCookie)
    }

    /// Fetch the profile for a session token.
    ///
    /// # Errors
    /// `Api` with status 401 when the token is missing, invalid or expired.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &str) -> Result<Profile, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/me")?)
            .header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"))
            .send()
            .await?;

        json_or_error(response).await
    }

    /// Ask the server to clear the session cookie.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: Option<&str>) -> Result<MessageResponse, ClientError> {
        let mut request = self.http.post(self.endpoint("/api/logout")?);
        if let Some(token) = token {
            request = request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"));
        }

        json_or_error(request.send().await?).await
    }
}

/// Pull the session token out of the response cookies.
fn session_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name.trim() == SESSION_COOKIE_NAME && !value.trim().is_empty())
                .then(|| value.trim().to_string())
        })
}

async fn json_or_error<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%status, "request rejected");
    let message = serde_json::from_str::<ErrorResponse>(&body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        },
        |err| err.error,
    );

    Err(ClientError::Api { status, message })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_bad_url() {
        assert!(matches!(
            AuthClient::new("not a url"),
            Err(ClientError::Url(_))
        ));
    }

    #[test]
    fn endpoint_joins_paths() {
        let client = AuthClient::new("http://localhost:4000").unwrap();
        assert_eq!(
            client.endpoint("/api/me").unwrap().as_str(),
            "http://localhost:4000/api/me"
        );
    }

    #[tokio::test]
    async fn validation_runs_before_any_request() {
        // Nothing listens on port 1, so reaching the network would be an Http error.
        let client = AuthClient::new("http://127.0.0.1:1").unwrap();

        assert!(matches!(
            client.signup("alice", "a@x.com", "weak").await,
            Err(ClientError::Validation(validation::WEAK_PASSWORD))
        ));
        assert!(matches!(
            client.signup("alice", "nope", "Secr3t!").await,
            Err(ClientError::Validation(validation::INVALID_EMAIL))
        ));
        assert!(matches!(
            client.signin("a@x.com", "").await,
            Err(ClientError::Validation(validation::MISSING_FIELDS))
        ));
    }

    #[test]
    fn session_token_from_set_cookie() {
        let response = http_response(&[
            "theme=dark; Path=/",
            "token=abc.def.ghi; Path=/; HttpOnly; SameSite=Lax; Max-Age=7200",
        ]);
        assert_eq!(session_token(&response).as_deref(), Some("abc.def.ghi"));

        let response = http_response(&["token=; Path=/; Max-Age=0"]);
        assert!(session_token(&response).is_none());
    }

    fn http_response(cookies: &[&str]) -> Response {
        let mut builder = axum::http::Response::builder();
        for cookie in cookies {
            builder = builder.header(SET_COOKIE, *cookie);
        }
        Response::from(builder.body(Vec::<u8>::new()).unwrap())
    }
}
