use super::{error::ApiError, session::extract_session_token};
use crate::{api::types::ErrorResponse, auth::AuthService, store::Profile};
use axum::{Json, extract::Extension, http::HeaderMap};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile of the signed-in user", body = Profile),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    auth: Extension<Arc<AuthService>>,
) -> Result<Json<Profile>, ApiError> {
    let token = extract_session_token(&headers);
    let profile = auth.session(token.as_deref()).await?;
    Ok(Json(profile))
}
