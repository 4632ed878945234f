use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::ads::dto::{AdOut, CreateAdRequest, DeleteOwnerQuery, OwnerQuery, UpdateAdRequest};
use crate::ads::repo::Advertisement;
use crate::error::{is_foreign_key_violation, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/advertisement", post(create_advertisement))
        .route(
            "/advertisement/:advertisement_id",
            get(get_advertisement)
                .patch(patch_advertisement)
                .delete(delete_advertisement),
        )
}

#[instrument(skip(state))]
pub async fn get_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i32>,
) -> Result<Json<AdOut>, ApiError> {
    let ad = Advertisement::find_by_id(&state.db, advertisement_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("advertisement not found".into()))?;
    Ok(Json(ad.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_advertisement(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdRequest>,
) -> Result<Json<AdOut>, ApiError> {
    let mut tx = state.db.begin().await?;
    let ad = match Advertisement::create(&mut *tx, &payload).await {
        Ok(ad) => ad,
        Err(e) if is_foreign_key_violation(&e) => {
            warn!(id_user = payload.id_user, "advertisement owner does not exist");
            return Err(ApiError::NotFound(
                "Только авторизованный ползователь может разместить объявление".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    info!(advertisement_id = ad.id, "advertisement created");
    Ok(Json(ad.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i32>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<UpdateAdRequest>,
) -> Result<Json<AdOut>, ApiError> {
    let mut tx = state.db.begin().await?;
    let ad = Advertisement::find_by_id(&mut *tx, advertisement_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("advertisement not found".into()))?;

    let owner = query.owner.as_deref().and_then(|v| v.parse::<i32>().ok());
    if owner != Some(ad.id_user) {
        warn!(advertisement_id, ?owner, "patch by non-owner rejected");
        return Err(ApiError::NotFound(
            "Менять объявление может только его владелец!".into(),
        ));
    }

    let ad = Advertisement::apply_patch(&mut *tx, advertisement_id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("advertisement not found".into()))?;
    tx.commit().await?;

    info!(advertisement_id, "advertisement updated");
    Ok(Json(ad.into()))
}

#[instrument(skip(state))]
pub async fn delete_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i32>,
    Query(query): Query<DeleteOwnerQuery>,
) -> Result<&'static str, ApiError> {
    let mut tx = state.db.begin().await?;
    let ad = Advertisement::find_by_id(&mut *tx, advertisement_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("advertisement not found".into()))?;

    if query.owner != ad.id_user {
        warn!(advertisement_id, owner = query.owner, "delete by non-owner rejected");
        return Err(ApiError::Conflict(
            "Удалять обяъвление может только его владелец!".into(),
        ));
    }

    Advertisement::delete(&mut *tx, advertisement_id).await?;
    tx.commit().await?;

    info!(advertisement_id, "advertisement deleted");
    Ok("Объявление удалено")
}
