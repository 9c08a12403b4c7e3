use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{MealListResponse, MealMetrics, MealResponse},
    extractors::{MealId, MealPayload},
    repo_types::Meal,
    services::compute_metrics,
};
use crate::{error::AppError, state::AppState, users::session::SessionUser};

const MEAL_NOT_FOUND: &str = "Meal not found";

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/metrics", get(get_metrics))
        .route("/meals/:meal_id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:meal_id", put(update_meal).delete(delete_meal))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealPayload(payload): MealPayload,
) -> Result<StatusCode, AppError> {
    let meal_id = state.meals.create(user.id, payload).await?;
    info!(%meal_id, "meal created");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealListResponse>, AppError> {
    let meals = state.meals.list_by_user(user.id).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
) -> Result<Json<MealResponse>, AppError> {
    let meal = find_owned_meal(&state, user.id, meal_id).await?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_metrics(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<MealMetrics>, AppError> {
    let metrics = compute_metrics(state.meals.as_ref(), user.id).await?;
    Ok(Json(metrics))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
    MealPayload(payload): MealPayload,
) -> Result<StatusCode, AppError> {
    find_owned_meal(&state, user.id, meal_id).await?;
    state.meals.update(meal_id, payload).await?;
    info!(%meal_id, "meal updated");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    MealId(meal_id): MealId,
) -> Result<StatusCode, AppError> {
    find_owned_meal(&state, user.id, meal_id).await?;
    state.meals.delete(meal_id).await?;
    info!(%meal_id, "meal deleted");
    Ok(StatusCode::OK)
}

/// Another user's meal is reported exactly like a missing one.
async fn find_owned_meal(state: &AppState, user_id: Uuid, meal_id: Uuid) -> Result<Meal, AppError> {
    match state.meals.get_by_id(meal_id).await? {
        Some(meal) if meal.user_id == user_id => Ok(meal),
        Some(meal) => {
            warn!(%meal_id, owner_id = %meal.user_id, "meal belongs to another user");
            Err(AppError::NotFound(MEAL_NOT_FOUND))
        }
        None => {
            warn!(%meal_id, "meal not found");
            Err(AppError::NotFound(MEAL_NOT_FOUND))
        }
    }
}
