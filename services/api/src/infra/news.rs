//! newsapi.org `/v2/everything` client.

use anyhow::{Context as _, anyhow};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::repository::NewsSource;
use crate::domain::types::NewsItem;

const QUERY: &str = "web design OR ui design OR ux design";
const PAGE_SIZE: &str = "10";

#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct EverythingResponse {
    articles: Vec<Article>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: String,
    url_to_image: Option<String>,
    published_at: String,
}

impl From<Article> for NewsItem {
    fn from(article: Article) -> Self {
        Self {
            title: article.title.unwrap_or_default(),
            description: article.description,
            url: article.url,
            image_url: article.url_to_image,
            published_at: article.published_at,
        }
    }
}

impl NewsSource for NewsApiClient {
    async fn fetch_design_news(&self) -> anyhow::Result<Vec<NewsItem>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("NEWS_API_KEY is not set"))?;

        let url = Url::parse_with_params(
            &format!("{}/v2/everything", self.base_url),
            &[
                ("q", QUERY),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", PAGE_SIZE),
                ("apiKey", api_key),
            ],
        )
        .context("build news url")?;

        let body: EverythingResponse = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, "catalog-api")
            .send()
            .await
            .context("request news")?
            .error_for_status()
            .context("news upstream status")?
            .json()
            .await
            .context("decode news response")?;

        Ok(body.articles.into_iter().map(NewsItem::from).collect())
    }
}
