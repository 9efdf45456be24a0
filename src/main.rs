use axum::{Router, routing::get};
use debtledger::{
    api::{handlers::api_routes, openapi::ApiDoc},
    config::CONFIG,
    core::services::DebtService,
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging,
        reputation::in_memory::InMemoryReputation, storage::in_memory::InMemoryStorage,
    },
};
use http::header;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&CONFIG.log_level))
        .init();

    let policy = CONFIG.policy();
    policy.validate()?;
    info!("Loaded configuration: {:?}", *CONFIG);

    let ledger = Arc::new(DebtService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        InMemoryCache::new(),
        InMemoryReputation::new(),
        policy,
        CONFIG.balance_cache_ttl(),
    ));

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(ledger))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
