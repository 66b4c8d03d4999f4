use anyhow::Context as _;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";

/// API service configuration loaded from environment variables.
///
/// A `.env` file in the working directory is merged into the environment by
/// `main` before this is read.
#[derive(Debug)]
pub struct ApiConfig {
    /// Database connection URL.
    pub database_url: String,
    /// HMAC secret for session tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 5000). Env var: `PORT`.
    pub port: u16,
    /// newsapi.org key. Without it `/api/news` serves the static samples.
    pub news_api_key: Option<String>,
    /// Base URL of the news upstream. Env var: `NEWS_API_URL`.
    pub news_api_url: String,
    /// Allowed browser origin. Any origin when unset. Env var: `CORS_ORIGIN`.
    pub cors_origin: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            news_api_key: non_empty_var("NEWS_API_KEY"),
            news_api_url: non_empty_var("NEWS_API_URL")
                .unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_owned()),
            cors_origin: non_empty_var("CORS_ORIGIN"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
