use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use catalog_api::config::ApiConfig;
use catalog_api::infra::news::NewsApiClient;
use catalog_api::router::build_router;
use catalog_api::state::AppState;
use catalog_auth_types::token::JwtSecret;
use catalog_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("info,sqlx=warn");

    let config = ApiConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.news_api_key.is_none() {
        info!("NEWS_API_KEY not set, /api/news will serve sample items");
    }

    let state = AppState {
        db,
        jwt_secret: JwtSecret::new(config.jwt_secret.as_str()),
        news: NewsApiClient::new(&config.news_api_url, config.news_api_key.clone()),
    };

    let router = build_router(state, config.cors_origin.as_deref());
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("api listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
