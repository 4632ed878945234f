use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::error::{is_unique_violation, ApiError};
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, UpdateUserRequest, UserOut};
use crate::users::repo::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route(
            "/user/:user_id",
            get(get_user).patch(patch_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserOut>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserOut>, ApiError> {
    let new_user = payload.validate()?;

    let mut tx = state.db.begin().await?;
    let user = match User::create(&mut *tx, &new_user).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %new_user.email, "duplicate email on create");
            return Err(ApiError::Conflict(
                "пользователь с таким email уже зарегистрирован".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    info!(user_id = user.id, "user created");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserOut>, ApiError> {
    let patch = payload.validate()?;

    let mut tx = state.db.begin().await?;
    let user = User::apply_patch(&mut *tx, user_id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    tx.commit().await?;

    info!(user_id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<&'static str, ApiError> {
    let mut tx = state.db.begin().await?;
    if !User::delete(&mut *tx, user_id).await? {
        return Err(ApiError::NotFound("user not found".into()));
    }
    tx.commit().await?;

    info!(user_id, "user deleted");
    Ok("Пользователь удален")
}
