use super::session::clear_session_cookie;
use crate::{api::types::MessageResponse, auth::AuthService};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, header::SET_COOKIE},
};
use std::sync::Arc;
use tracing::error;

pub const LOGGED_OUT: &str = "Logged out";

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth: Extension<Arc<AuthService>>) -> (HeaderMap, Json<MessageResponse>) {
    // Sessions are stateless; clearing the cookie is all there is.
    let mut headers = HeaderMap::new();
    match clear_session_cookie(auth.config()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    (headers, Json(MessageResponse::new(LOGGED_OUT)))
}
