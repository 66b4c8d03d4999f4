use crate::domain::repository::NewsSource;
use crate::domain::types::NewsItem;

pub struct GetNewsUseCase<N: NewsSource> {
    pub source: N,
}

impl<N: NewsSource> GetNewsUseCase<N> {
    /// Never fails: any upstream error is logged and replaced by [`sample_news`].
    pub async fn execute(&self) -> Vec<NewsItem> {
        match self.source.fetch_design_news().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "news upstream failed, serving samples");
                sample_news()
            }
        }
    }
}

/// Static headlines served when the upstream is unavailable.
pub fn sample_news() -> Vec<NewsItem> {
    vec![
        NewsItem {
            title: "The Future of UI Design: Trends to Watch in 2025".into(),
            description: Some(
                "Explore the upcoming trends in UI design that will shape the digital landscape in 2025 and beyond."
                    .into(),
            ),
            url: "https://example.com/ui-design-trends-2025".into(),
            image_url: Some("https://example.com/images/ui-trends.jpg".into()),
            published_at: "2025-03-25T10:30:00Z".into(),
        },
        NewsItem {
            title: "How AI is Transforming the Design Industry".into(),
            description: Some(
                "Artificial intelligence tools are revolutionizing how designers work, enabling new levels of creativity and efficiency."
                    .into(),
            ),
            url: "https://example.com/ai-design-transformation".into(),
            image_url: Some("https://example.com/images/ai-design.jpg".into()),
            published_at: "2025-03-20T14:15:00Z".into(),
        },
        NewsItem {
            title: "Sustainable Design Practices for Digital Products".into(),
            description: Some(
                "Learn how designers are incorporating sustainability principles into digital product design to reduce environmental impact."
                    .into(),
            ),
            url: "https://example.com/sustainable-design".into(),
            image_url: Some("https://example.com/images/sustainable-design.jpg".into()),
            published_at: "2025-03-15T09:45:00Z".into(),
        },
    ]
}
