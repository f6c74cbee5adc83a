//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Character models
    ActionResponse,
    BadgeResponse,
    // Recommendation models
    BookResponse,
    CharacterResponse,
    CreateCharacterRequest,
    // Store models
    EquipRequest,
    MarkReadRequest,
    // Profile models
    ProfileRequest,
    ProfileResponse,
    ReadingEntryResponse,
    RecommendationResponse,
    RecommendationsResponse,
    StoreItemResponse,
    UpdateCharacterRequest,
    UserRecommendationsRequest,
    UserRecommendationsResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Recommendation endpoints
        super::recommendations::recommend,
        super::recommendations::list_books,
        super::recommendations::recommend_for_user,
        // Profile endpoints
        super::profile::get_profile,
        super::profile::put_profile,
        // Character endpoints
        super::character::get_character,
        super::character::create_character,
        super::character::update_character,
        super::character::delete_character,
        super::character::get_badges,
        super::character::mark_book_read,
        // Store endpoints
        super::store::list_store,
        super::store::purchase_item,
        super::store::equip_item,
    ),
    info(
        title = "Lumina API",
        version = "0.1.0",
        description = "Lumina - Reading companion API\n\nTag-based book recommendations and a reader character that levels up with every finished book.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Recommendations", description = "Recommendations - Catalog ranking by shared tags"),
        (name = "Profile", description = "Profile - Stored reading preferences"),
        (name = "Character", description = "Character - Experience, levels and reading history"),
        (name = "Store", description = "Store - Coins, cosmetics and consumables"),
    ),
    components(
        schemas(
            // Recommendations
            BookResponse,
            RecommendationResponse,
            RecommendationsResponse,
            UserRecommendationsRequest,
            UserRecommendationsResponse,
            // Profile
            ProfileRequest,
            ProfileResponse,
            // Character
            CreateCharacterRequest,
            UpdateCharacterRequest,
            MarkReadRequest,
            ReadingEntryResponse,
            CharacterResponse,
            BadgeResponse,
            ActionResponse,
            // Store
            StoreItemResponse,
            EquipRequest,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/lumina/recommendations",
            "/lumina/books",
            "/lumina/store",
            "/lumina/users/{user_id}/profile",
            "/lumina/users/{user_id}/recommendations",
            "/lumina/users/{user_id}/character",
            "/lumina/users/{user_id}/character/badges",
            "/lumina/users/{user_id}/books/{book_id}/read",
            "/lumina/users/{user_id}/store/{item_id}/purchase",
            "/lumina/users/{user_id}/equipped/{slot}",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}
