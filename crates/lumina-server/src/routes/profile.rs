//! Profile Routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use lumina::DomainError;

use super::{api_error, ApiError};
use crate::models::{ProfileRequest, ProfileResponse};
use crate::AppState;

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/lumina/users/{user_id}/profile",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .recommendation_service
        .get_profile(&user_id)
        .await
        .map_err(api_error)?
        .ok_or_else(|| api_error(DomainError::not_found("Profile", &user_id)))?;

    Ok(Json(profile.into()))
}

/// Create or replace a user's profile
#[utoipa::path(
    put,
    path = "/lumina/users/{user_id}/profile",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ProfileResponse),
        (status = 400, description = "Value out of range or no usable tag"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Profile"
)]
pub async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let saved = state
        .recommendation_service
        .save_profile(&user_id, payload.into())
        .await
        .map_err(api_error)?;

    Ok(Json(saved.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/lumina/users/:user_id/profile",
        get(get_profile).put(put_profile),
    )
}
