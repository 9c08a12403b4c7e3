use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
    users::{
        dto::{parse_user_body, UserResponse},
        session::SessionUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(get_me))
}

/// Creates an account bound to the caller's session cookie, issuing one if absent.
#[instrument(skip(state, jar, body))]
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(CookieJar, StatusCode), AppError> {
    let Json(body) = body?;
    let new_user = parse_user_body(&body).map_err(|errors| {
        warn!(%errors, "invalid user body");
        errors
    })?;

    let session = &state.config.session;
    let existing = jar.get(&session.cookie_name).map(|c| c.value().to_string());
    let (jar, session_id) = match existing {
        Some(existing) if !existing.is_empty() => (jar, existing),
        _ => {
            let session_id = Uuid::new_v4().to_string();
            let cookie = Cookie::build((session.cookie_name.clone(), session_id.clone()))
                .path("/")
                .http_only(true)
                .max_age(time::Duration::days(session.max_age_days));
            (jar.add(cookie), session_id)
        }
    };

    let user = state.users.create(new_user, &session_id).await?;
    info!(user_id = %user.id, "user created");
    Ok((jar, StatusCode::CREATED))
}

#[instrument(skip_all)]
pub async fn get_me(SessionUser(user): SessionUser) -> Json<UserResponse> {
    Json(UserResponse { user: user.into() })
}
