//! Store Routes - Purchases and equipment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use lumina::EquipSlot;

use super::{api_error, ApiError};
use crate::models::{ActionResponse, EquipRequest, StoreItemResponse};
use crate::AppState;

/// List the store catalog
#[utoipa::path(
    get,
    path = "/lumina/store",
    responses(
        (status = 200, description = "Items on sale", body = Vec<StoreItemResponse>)
    ),
    tag = "Store"
)]
pub async fn list_store(State(state): State<AppState>) -> Json<Vec<StoreItemResponse>> {
    Json(
        state
            .character_service
            .store()
            .iter()
            .map(StoreItemResponse::from)
            .collect(),
    )
}

/// Buy an item
#[utoipa::path(
    post,
    path = "/lumina/users/{user_id}/store/{item_id}/purchase",
    params(
        ("user_id" = String, Path, description = "External user ID"),
        ("item_id" = String, Path, description = "Store item ID")
    ),
    responses(
        (status = 200, description = "Purchased, or rejected with a reason", body = ActionResponse),
        (status = 404, description = "Character not found"),
        (status = 409, description = "Concurrent modification"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Store"
)]
pub async fn purchase_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, ApiError> {
    let outcome = state
        .character_service
        .purchase(&user_id, &item_id)
        .await
        .map_err(api_error)?;

    Ok(Json(outcome.into()))
}

/// Equip an owned item, or clear the slot with `item_id: null`
#[utoipa::path(
    put,
    path = "/lumina/users/{user_id}/equipped/{slot}",
    params(
        ("user_id" = String, Path, description = "External user ID"),
        ("slot" = String, Path, description = "hat | glasses | beard")
    ),
    request_body = EquipRequest,
    responses(
        (status = 200, description = "Equipped, or rejected with a reason", body = ActionResponse),
        (status = 400, description = "Unknown slot"),
        (status = 404, description = "Character not found"),
        (status = 409, description = "Concurrent modification"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Store"
)]
pub async fn equip_item(
    State(state): State<AppState>,
    Path((user_id, slot)): Path<(String, String)>,
    Json(payload): Json<EquipRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let slot: EquipSlot = slot.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let outcome = state
        .character_service
        .equip(&user_id, slot, payload.item_id.as_deref())
        .await
        .map_err(api_error)?;

    Ok(Json(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lumina/store", get(list_store))
        .route(
            "/lumina/users/:user_id/store/:item_id/purchase",
            post(purchase_item),
        )
        .route("/lumina/users/:user_id/equipped/:slot", put(equip_item))
}
