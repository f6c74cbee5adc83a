use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lumina::{BookCatalog, CharacterRepository, ProfileRepository};

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{
    HttpProgressMirror, InMemoryCharacterRepository, InMemoryProfileRepository, MirrorConfig,
    PgCharacterRepository, PgProfileRepository, StaticBookCatalog,
};
use application::{CharacterService, RecommendationService};
use config::{ServerConfig, StorageBackend};

/// Application services over whichever storage was configured
pub type AppCharacterService = CharacterService<dyn CharacterRepository, dyn BookCatalog>;
pub type AppRecommendationService = RecommendationService<dyn ProfileRepository, dyn BookCatalog>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub character_service: Arc<AppCharacterService>,
    pub recommendation_service: Arc<AppRecommendationService>,
    pub config: Arc<ServerConfig>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Lumina API is running - keep reading".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble the HTTP surface
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::recommendations::router())
        .merge(routes::profile::router())
        .merge(routes::character::router())
        .merge(routes::store::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("📖 Lumina API initializing...");

    let config = ServerConfig::from_lookup(|key| secrets.get(key));

    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No LUMINA_API_KEY set - authentication disabled");
    }

    let catalog = StaticBookCatalog::bundled()
        .map_err(|e| anyhow::anyhow!("Failed to load book catalog: {}", e))?;
    tracing::info!("📗 Book catalog loaded ({} books)", catalog.len());
    let catalog: Arc<dyn BookCatalog> = Arc::new(catalog);

    let characters: Arc<dyn CharacterRepository>;
    let profiles: Arc<dyn ProfileRepository>;
    match config.storage {
        StorageBackend::Postgres => {
            sqlx::migrate!()
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;
            tracing::info!("✅ Database migrations completed");

            characters = Arc::new(PgCharacterRepository::new(pool.clone()));
            profiles = Arc::new(PgProfileRepository::new(pool));
        }
        StorageBackend::Memory => {
            tracing::warn!("⚠️  LUMINA_STORAGE=memory - progress is lost on restart");
            characters = Arc::new(InMemoryCharacterRepository::new());
            profiles = Arc::new(InMemoryProfileRepository::new());
        }
    }

    let mut character_service = CharacterService::new(characters, catalog.clone());

    match config.mirror_url.clone() {
        Some(url) => {
            match HttpProgressMirror::new(MirrorConfig::new(url, config.mirror_secret.clone())) {
                Ok(mirror) => {
                    character_service = character_service.with_mirror(Arc::new(mirror));
                    tracing::info!("🪞 Progress mirror enabled");
                }
                Err(e) => tracing::warn!("⚠️  Failed to initialize progress mirror: {}", e),
            }
        }
        None => tracing::info!("No MIRROR_URL set - progress mirror disabled"),
    }

    let state = AppState {
        character_service: Arc::new(character_service),
        recommendation_service: Arc::new(RecommendationService::new(profiles, catalog)),
        config: Arc::new(config),
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Lumina API ready");

    Ok(router.into())
}
