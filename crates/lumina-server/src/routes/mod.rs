//! Lumina API Routes
//!
//! - /lumina/recommendations - Ad-hoc recommendations for a profile
//! - /lumina/books - Book catalog
//! - /lumina/store - Store catalog
//! - /lumina/users/:user_id/profile - Stored reading preferences
//! - /lumina/users/:user_id/character - Character progression
//! - /lumina/users/:user_id/books/:book_id/read - Reading credit
//! - /lumina/users/:user_id/store/:item_id/purchase - Purchases
//! - /lumina/users/:user_id/equipped/:slot - Equipment

use axum::http::StatusCode;

use lumina::DomainError;

pub mod character;
pub mod profile;
pub mod recommendations;
pub mod store;
pub mod swagger;

/// Error type returned by every handler
pub type ApiError = (StatusCode, String);

/// Map a domain error onto an HTTP status
pub fn api_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Repository(_) | DomainError::ExternalService(_) => {
            tracing::error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use crate::adapters::{InMemoryCharacterRepository, InMemoryProfileRepository, StaticBookCatalog};
    use crate::application::{CharacterService, RecommendationService};
    use crate::config::ServerConfig;
    use crate::{build_router, AppState};

    fn state() -> AppState {
        let catalog: Arc<dyn lumina::BookCatalog> = Arc::new(StaticBookCatalog::bundled().unwrap());
        let characters: Arc<dyn lumina::CharacterRepository> = Arc::new(InMemoryCharacterRepository::new());
        let profiles: Arc<dyn lumina::ProfileRepository> = Arc::new(InMemoryProfileRepository::new());

        AppState {
            character_service: Arc::new(CharacterService::new(characters, catalog.clone())),
            recommendation_service: Arc::new(RecommendationService::new(profiles, catalog)),
            config: Arc::new(ServerConfig::default()),
        }
    }

    async fn call(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn test_api_error_status() {
        assert_eq!(api_error(DomainError::not_found("Character", "u1")).0, StatusCode::NOT_FOUND);
        assert_eq!(api_error(DomainError::Validation("x".into())).0, StatusCode::BAD_REQUEST);
        assert_eq!(api_error(DomainError::Conflict("x".into())).0, StatusCode::CONFLICT);
        assert_eq!(
            api_error(DomainError::Repository("x".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let app = build_router(state());
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_recommendations_endpoint() {
        let app = build_router(state());

        let (status, body) = call(
            &app,
            Method::POST,
            "/lumina/recommendations",
            Some(serde_json::json!({ "tags": ["fantasía", "aventura"], "goal": "entretener" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 10);
        assert_eq!(body["recommendations"][0]["id"], "b005");
        assert_eq!(body["recommendations"][0]["score"], 106);
        assert_eq!(body["recommendations"][0]["why"], "Matches your interests at 100%");

        let (status, _) = call(
            &app,
            Method::POST,
            "/lumina/recommendations",
            Some(serde_json::json!({ "tags": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_character_lifecycle() {
        let app = build_router(state());

        let (status, _) = call(&app, Method::GET, "/lumina/users/u1/character", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::POST,
            "/lumina/users/u1/character",
            Some(serde_json::json!({ "name": "Ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], 1);
        assert_eq!(body["xp_to_next_level"], 100);

        let (status, body) = call(
            &app,
            Method::POST,
            "/lumina/users/u1/books/b004/read",
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        // 310 pages, difficulty 2: 50 + 31 + 10
        assert_eq!(body["receipt"]["xp_gained"], 91);
        assert_eq!(body["character"]["coins"], 70);

        let (status, body) = call(&app, Method::POST, "/lumina/users/u1/books/b004/read", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "already_read");
        assert_eq!(body["character"]["books_read_count"], 1);

        let (status, body) = call(&app, Method::GET, "/lumina/users/u1/character/badges", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "first-book");
        assert_eq!(body[0]["unlocked"], true);
    }

    #[tokio::test]
    async fn test_store_and_equip_endpoints() {
        let app = build_router(state());
        call(
            &app,
            Method::POST,
            "/lumina/users/u1/character",
            Some(serde_json::json!({ "name": "Ada" })),
        )
        .await;

        let (status, body) = call(&app, Method::GET, "/lumina/store", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(11));

        let (status, body) = call(&app, Method::POST, "/lumina/users/u1/store/hat_cap/purchase", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "insufficient_funds");

        let (status, _) = call(
            &app,
            Method::PUT,
            "/lumina/users/u1/equipped/cape",
            Some(serde_json::json!({ "item_id": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            "/lumina/users/u1/equipped/hat",
            Some(serde_json::json!({ "item_id": "hat_cap" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "not_owned");
    }

    #[tokio::test]
    async fn test_user_recommendations_grant_daily_bonus_once() {
        let app = build_router(state());
        call(
            &app,
            Method::PUT,
            "/lumina/users/u1/profile",
            Some(serde_json::json!({ "tags": ["Misterio"], "goal": "learn" })),
        )
        .await;
        call(
            &app,
            Method::POST,
            "/lumina/users/u1/character",
            Some(serde_json::json!({ "name": "Ada" })),
        )
        .await;

        let request = serde_json::json!({ "today": "2024-06-01" });
        let (status, body) = call(
            &app,
            Method::POST,
            "/lumina/users/u1/recommendations",
            Some(request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bonus_granted"], true);
        assert_eq!(body["xp_gained"], 25);
        assert_eq!(body["character"]["xp"], 25);

        let (_, body) = call(
            &app,
            Method::POST,
            "/lumina/users/u1/recommendations",
            Some(request),
        )
        .await;
        assert_eq!(body["bonus_granted"], false);
        assert_eq!(body["character"]["xp"], 25);

        let (status, body) = call(&app, Method::GET, "/lumina/users/u1/profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"][0], "misterio");
    }

    #[tokio::test]
    async fn test_invalid_profile_rejected() {
        let app = build_router(state());
        let (status, _) = call(
            &app,
            Method::PUT,
            "/lumina/users/u1/profile",
            Some(serde_json::json!({ "age": 200, "tags": ["misterio"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
