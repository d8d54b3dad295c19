use axum::{routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod config;
mod models;
mod routes;

use adapters::{CsvCatalogSource, InMemoryCatalogRepository, PgCatalogRepository};
use application::{BackfillConfig, BackfillService, IngestService, SearchService};
use config::{AppConfig, StoreKind};
use marquee::CatalogRepository;

/// Type aliases for application services over the configured store
pub type AppIngestService = IngestService<dyn CatalogRepository>;
pub type AppBackfillService = BackfillService<dyn CatalogRepository>;
pub type AppSearchService = SearchService<dyn CatalogRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub ingest_service: Arc<AppIngestService>,
    pub backfill_service: Arc<AppBackfillService>,
    pub search_service: Arc<AppSearchService>,
}

impl AppState {
    pub fn new(
        ingest_service: AppIngestService,
        backfill_service: AppBackfillService,
        search_service: AppSearchService,
    ) -> Self {
        Self {
            ingest_service: Arc::new(ingest_service),
            backfill_service: Arc::new(backfill_service),
            search_service: Arc::new(search_service),
        }
    }
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
        message: "Marquee API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble every route with shared state
pub fn build_router(state: AppState) -> Router {
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::import::router())
        .merge(routes::backfill::router())
        .merge(routes::search::router())
        .merge(routes::status::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🎬 Marquee API initializing...");

    let config = AppConfig::from_lookup(|key| secrets.get(key)).map_err(anyhow::Error::from)?;

    if config.emulated {
        tracing::warn!("⚠️  Emulated mode - page limit {}", config.page_limit);
    }
    if config.use_stub_provider() {
        tracing::warn!("⚠️  Stub embeddings in use - search results are not semantic");
    }

    let repo: Arc<dyn CatalogRepository> = match config.store {
        StoreKind::Postgres => {
            sqlx::migrate!()
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;
            tracing::info!("✅ Database migrations completed");
            Arc::new(PgCatalogRepository::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("⚠️  In-memory catalog store - data is lost on restart");
            Arc::new(InMemoryCatalogRepository::new())
        }
    };

    let embedder = adapters::embedding::from_config(&config).map_err(anyhow::Error::from)?;
    let source = Arc::new(CsvCatalogSource::new(config.source_path.clone()));

    tracing::info!("📄 Catalog source: {}", config.source_path.display());

    let state = AppState::new(
        IngestService::new(repo.clone(), source, config.batch_size),
        BackfillService::new(repo.clone(), embedder.clone(), BackfillConfig::from(&config)),
        SearchService::new(repo, embedder, config.embedding_dimension),
    );

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Marquee API ready");

    Ok(router.into())
}
