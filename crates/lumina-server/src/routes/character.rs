//! Character Routes - Reader progression
//!
//! HTTP handlers that delegate to CharacterService for business logic.
//! Rejected actions answer 200 with `success: false`.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use lumina::DomainError;

use super::{api_error, ApiError};
use crate::models::{
    ActionResponse, BadgeResponse, CharacterResponse, CreateCharacterRequest, MarkReadRequest,
    UpdateCharacterRequest,
};
use crate::AppState;

/// Get a user's character
#[utoipa::path(
    get,
    path = "/lumina/users/{user_id}/character",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    responses(
        (status = 200, description = "Character found", body = CharacterResponse),
        (status = 404, description = "Character not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = state
        .character_service
        .get(&user_id)
        .await
        .map_err(api_error)?
        .ok_or_else(|| api_error(DomainError::not_found("Character", &user_id)))?;

    Ok(Json(character.into()))
}

/// Create a user's character
#[utoipa::path(
    post,
    path = "/lumina/users/{user_id}/character",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    request_body = CreateCharacterRequest,
    responses(
        (status = 200, description = "Character created", body = CharacterResponse),
        (status = 400, description = "Invalid name"),
        (status = 409, description = "User already has a character"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn create_character(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateCharacterRequest>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = state
        .character_service
        .create(&user_id, &payload.name, payload.avatar.as_deref())
        .await
        .map_err(api_error)?;

    Ok(Json(character.into()))
}

/// Rename a character or change its avatar
#[utoipa::path(
    put,
    path = "/lumina/users/{user_id}/character",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    request_body = UpdateCharacterRequest,
    responses(
        (status = 200, description = "Character updated", body = CharacterResponse),
        (status = 400, description = "Invalid name"),
        (status = 404, description = "Character not found"),
        (status = 409, description = "Concurrent modification"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn update_character(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateCharacterRequest>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let character = state
        .character_service
        .update_identity(&user_id, payload.name, payload.avatar)
        .await
        .map_err(api_error)?;

    Ok(Json(character.into()))
}

/// Delete a user's character
#[utoipa::path(
    delete,
    path = "/lumina/users/{user_id}/character",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    responses(
        (status = 200, description = "Character deleted"),
        (status = 404, description = "Character not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn delete_character(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .character_service
        .delete(&user_id)
        .await
        .map_err(api_error)?;

    if !deleted {
        return Err(api_error(DomainError::not_found("Character", &user_id)));
    }

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Character deleted"
    })))
}

/// List badges and whether they are unlocked
#[utoipa::path(
    get,
    path = "/lumina/users/{user_id}/character/badges",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    responses(
        (status = 200, description = "All badges", body = Vec<BadgeResponse>),
        (status = 404, description = "Character not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn get_badges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<BadgeResponse>>, ApiError> {
    let badges = state
        .character_service
        .badges(&user_id)
        .await
        .map_err(api_error)?;

    Ok(Json(badges.into_iter().map(Into::into).collect()))
}

/// Credit a finished book
#[utoipa::path(
    post,
    path = "/lumina/users/{user_id}/books/{book_id}/read",
    params(
        ("user_id" = String, Path, description = "External user ID"),
        ("book_id" = String, Path, description = "Catalog or external book ID")
    ),
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Credited, or rejected as already read", body = ActionResponse),
        (status = 404, description = "Character or book not found"),
        (status = 409, description = "Concurrent modification"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Character"
)]
pub async fn mark_book_read(
    State(state): State<AppState>,
    Path((user_id, book_id)): Path<(String, String)>,
    payload: Option<Json<MarkReadRequest>>,
) -> Result<Json<ActionResponse>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let read_at = request.read_at.unwrap_or_else(Utc::now);

    let outcome = state
        .character_service
        .mark_book_read(&user_id, &book_id, request.meta(), read_at)
        .await
        .map_err(api_error)?;

    Ok(Json(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/lumina/users/:user_id/character",
            get(get_character)
                .post(create_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/lumina/users/:user_id/character/badges", get(get_badges))
        .route(
            "/lumina/users/:user_id/books/:book_id/read",
            post(mark_book_read),
        )
}
