use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::{dto::parse_meal_body, repo_types::MealFields};
use crate::{error::AppError, validation::ValidationErrors};

/// `:meal_id` path segment, which must be a well-formed UUID.
pub struct MealId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for MealId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        let id = is_hyphenated_uuid(&raw)
            .then(|| Uuid::parse_str(&raw).ok())
            .flatten()
            .ok_or_else(|| ValidationErrors::single("mealId", "Invalid uuid"))?;
        Ok(MealId(id))
    }
}

/// Only the 8-4-4-4-12 form; simple, braced and urn forms are refused.
fn is_hyphenated_uuid(raw: &str) -> bool {
    raw.len() == 36
        && raw.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Validated meal body.
pub struct MealPayload(pub MealFields);

#[async_trait]
impl<S> FromRequest<S> for MealPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        Ok(MealPayload(parse_meal_body(&body)?))
    }
}
