use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{error::AppError, state::AppState, users::repo::User};

/// The user owning the request's session cookie.
///
/// Rejects with `401` when the cookie is absent or names no known session.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                warn!("missing session cookie");
                AppError::Unauthorized
            })?;

        match state.users.find_by_session_id(&session_id).await? {
            Some(user) => Ok(SessionUser(user)),
            None => {
                warn!("unknown session id");
                Err(AppError::Unauthorized)
            }
        }
    }
}
