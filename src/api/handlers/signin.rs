use super::{error::ApiError, session::session_cookie};
use crate::{
    api::types::{ErrorResponse, MessageResponse, SigninRequest},
    auth::{AuthError, AuthService},
};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, header::SET_COOKIE},
};
use std::sync::Arc;

pub const LOGGED_IN: &str = "Logged in";

#[utoipa::path(
    post,
    path = "/api/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = MessageResponse,
            headers(("Set-Cookie" = String, description = "token=<jwt>; Path=/; HttpOnly; SameSite=Lax"))),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signin(
    auth: Extension<Arc<AuthService>>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let Json(request) = payload?;

    let signed_in = auth.signin(&request.email, &request.password).await?;

    let cookie = session_cookie(auth.config(), &signed_in.token)
        .map_err(|err| AuthError::Unexpected(format!("session cookie: {err}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    Ok((headers, Json(MessageResponse::new(LOGGED_IN))))
}
