use axum::{Json, extract::State};
use serde::Serialize;

use crate::domain::types::NewsItem;
use crate::state::AppState;
use crate::usecase::news::GetNewsUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemResponse {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
}

impl From<NewsItem> for NewsItemResponse {
    fn from(item: NewsItem) -> Self {
        Self {
            title: item.title,
            description: item.description,
            url: item.url,
            image_url: item.image_url,
            published_at: item.published_at,
        }
    }
}

#[derive(Serialize)]
pub struct NewsResponse {
    pub status: &'static str,
    pub results: usize,
    pub news: Vec<NewsItemResponse>,
}

// ── GET /api/news ────────────────────────────────────────────────────────────

pub async fn get_news(State(state): State<AppState>) -> Json<NewsResponse> {
    let usecase = GetNewsUseCase {
        source: state.news.clone(),
    };
    let news: Vec<NewsItemResponse> = usecase
        .execute()
        .await
        .into_iter()
        .map(NewsItemResponse::from)
        .collect();
    Json(NewsResponse {
        status: "success",
        results: news.len(),
        news,
    })
}
