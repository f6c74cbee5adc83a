//! Recommendation Routes
//!
//! HTTP handlers that delegate to RecommendationService, and to
//! CharacterService for the daily recommendation bonus.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use lumina::{DomainError, Profile, Rejection};

use super::{api_error, ApiError};
use crate::models::{
    BookResponse, ProfileRequest, RecommendationsResponse, UserRecommendationsRequest,
    UserRecommendationsResponse,
};
use crate::AppState;

/// Recommend books for an ad-hoc profile
#[utoipa::path(
    post,
    path = "/lumina/recommendations",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Up to 10 books, best match first", body = RecommendationsResponse),
        (status = 400, description = "Profile has no usable tag"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Recommendations"
)]
pub async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let profile = Profile::from(payload);
    let ranked = state
        .recommendation_service
        .recommend(&profile)
        .await
        .map_err(api_error)?;

    Ok(Json(ranked.into()))
}

/// List the book catalog
#[utoipa::path(
    get,
    path = "/lumina/books",
    responses(
        (status = 200, description = "Every catalog book", body = Vec<BookResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Recommendations"
)]
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state
        .recommendation_service
        .catalog()
        .await
        .map_err(api_error)?;

    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// Recommend books for a user's stored profile
///
/// The first request of the day also grants the recommendation bonus when the
/// user has a character.
#[utoipa::path(
    post,
    path = "/lumina/users/{user_id}/recommendations",
    params(
        ("user_id" = String, Path, description = "External user ID")
    ),
    request_body = UserRecommendationsRequest,
    responses(
        (status = 200, description = "Recommendations and bonus outcome", body = UserRecommendationsResponse),
        (status = 400, description = "Stored profile has no usable tag"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Recommendations"
)]
pub async fn recommend_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Option<Json<UserRecommendationsRequest>>,
) -> Result<Json<UserRecommendationsResponse>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let today = request
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let ranked = state
        .recommendation_service
        .recommend_for_user(&user_id)
        .await
        .map_err(api_error)?;
    let recommendations: RecommendationsResponse = ranked.into();

    let mut response = UserRecommendationsResponse {
        recommendations: recommendations.recommendations,
        count: recommendations.count,
        bonus_granted: false,
        xp_gained: 0,
        levels_gained: 0,
        character: None,
    };

    let bonus = state
        .character_service
        .claim_recommendation_bonus(&user_id, state.config.recommendation_bonus_xp, today)
        .await;

    match bonus {
        Ok(outcome) => {
            match &outcome.result {
                Ok(grant) => {
                    response.bonus_granted = true;
                    response.xp_gained = grant.xp_gained;
                    response.levels_gained = grant.levels_gained;
                }
                Err(Rejection::AlreadyRewardedToday { .. }) => {}
                Err(other) => tracing::warn!("Unexpected bonus rejection for {}: {}", user_id, other),
            }
            response.character = Some(outcome.character.into());
        }
        // Recommendations work without a character
        Err(DomainError::NotFound { .. }) => {}
        Err(e) => return Err(api_error(e)),
    }

    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lumina/recommendations", post(recommend))
        .route("/lumina/books", get(list_books))
        .route(
            "/lumina/users/:user_id/recommendations",
            post(recommend_for_user),
        )
}
