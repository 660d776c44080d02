// src/news.rs
// Proxy to the third-party news provider. Every failure is reported inside a
// normal response body (`status: "error"`), never as a transport error.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::defs::{NEWS_CATEGORIES, NEWS_DEFAULT_LANGUAGE, NEWS_FALLBACK_CATEGORY};
use crate::logging::{log_debug, log_error, log_warning};

#[derive(Debug, Clone, Deserialize)]
pub struct NewsRequest {
    pub category: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    NEWS_DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub source: String,
    pub published: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
    pub status: NewsStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl NewsResponse {
    pub fn success(articles: Vec<Article>) -> Self {
        Self {
            articles,
            status: NewsStatus::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            status: NewsStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Translate a frontend category into the provider's vocabulary
pub fn map_category(category: &str) -> &'static str {
    NEWS_CATEGORIES
        .iter()
        .find(|(ours, _)| *ours == category)
        .map(|(_, theirs)| *theirs)
        .unwrap_or(NEWS_FALLBACK_CATEGORY)
}

// A JSON null or a non-string counts as absent
fn text_field<'a>(article: &'a Value, key: &str) -> Option<&'a str> {
    article.get(key).and_then(Value::as_str)
}

/// Reshape one provider article, tagging it with the category the caller asked for
pub fn reshape_article(article: &Value, requested_category: &str) -> Article {
    let text = |key: &str, default: &str| text_field(article, key).unwrap_or(default).to_string();

    Article {
        id: text_field(article, "article_id")
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: text("title", "No title"),
        description: text("description", "No description available"),
        url: text("link", ""),
        image: text("image_url", ""),
        source: text_field(article, "source_name")
            .or_else(|| text_field(article, "source_id"))
            .unwrap_or("Unknown")
            .to_string(),
        published: text("pubDate", ""),
        category: requested_category.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    page_size: u8,
}

impl NewsClient {
    pub fn new(api_url: &str, api_key: Option<String>, timeout: Duration, page_size: u8) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.to_string(),
            api_key,
            page_size,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.news_api_url,
            config.news_api_key.clone(),
            Duration::from_secs(config.news_timeout),
            config.news_page_size,
        )
    }

    /// Fetch one page of articles for `category`. Never fails: errors come back
    /// as an empty article list with `status: "error"`.
    pub async fn fetch_news(&self, category: &str, language: &str) -> NewsResponse {
        match self.try_fetch(category, language).await {
            Ok(articles) => NewsResponse::success(articles),
            Err(e) => {
                log_error(&format!("News API error: {e}"));
                NewsResponse::error(e.to_string())
            }
        }
    }

    async fn try_fetch(&self, category: &str, language: &str) -> Result<Vec<Article>, Box<dyn std::error::Error + Send + Sync>> {
        let api_category = map_category(category);
        if api_category == NEWS_FALLBACK_CATEGORY && category != NEWS_FALLBACK_CATEGORY {
            log_warning(&format!("Unknown news category '{category}', using '{NEWS_FALLBACK_CATEGORY}'"));
        }

        let mut query: Vec<(&str, String)> = Vec::with_capacity(4);
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }
        query.push(("category", api_category.to_string()));
        query.push(("language", language.to_string()));
        query.push(("size", self.page_size.to_string()));

        log_debug(&format!("Requesting news: category={api_category}, language={language}"));
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(format!("Failed to fetch news: upstream returned {}", response.status()).into());
        }

        let data: Value = response.json().await?;
        let articles = data
            .get("results")
            .and_then(Value::as_array)
            .map(|results| results.iter().map(|article| reshape_article(article, category)).collect())
            .unwrap_or_default();

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn mock_news(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({
            "status": "success",
            "results": [
                {
                    "article_id": "a1",
                    "title": format!("{} in {}", params.get("category").cloned().unwrap_or_default(),
                        params.get("language").cloned().unwrap_or_default()),
                    "description": null,
                    "link": "https://example.com/a1",
                    "image_url": "https://example.com/a1.png",
                    "source_name": "Example",
                    "pubDate": "2024-05-01 10:00:00"
                },
                {
                    "title": format!("size={} key={}", params.get("size").cloned().unwrap_or_default(),
                        params.get("apikey").cloned().unwrap_or_default())
                }
            ]
        }))
    }

    async fn mock_failure() -> (StatusCode, &'static str) {
        (StatusCode::TOO_MANY_REQUESTS, "rate limited")
    }

    async fn mock_empty() -> Json<Value> {
        Json(json!({ "status": "success" }))
    }

    async fn mock_slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(json!({ "status": "success", "results": [] }))
    }

    async fn spawn_mock_upstream() -> SocketAddr {
        let app = Router::new()
            .route("/news", get(mock_news))
            .route("/failing", get(mock_failure))
            .route("/empty", get(mock_empty))
            .route("/slow", get(mock_slow));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    fn client_for(url: String, api_key: Option<&str>) -> NewsClient {
        NewsClient::new(&url, api_key.map(str::to_string), Duration::from_secs(5), 10).unwrap()
    }

    #[test]
    fn test_map_category() {
        assert_eq!(map_category("sports"), "sports");
        assert_eq!(map_category("esports"), "technology");
        assert_eq!(map_category("international"), "world");
        assert_eq!(map_category("national"), "domestic");
        assert_eq!(map_category("politics"), "politics");
        assert_eq!(map_category("tech"), "technology");
        assert_eq!(map_category("foo"), "general");
        assert_eq!(map_category("Sports"), "general");
    }

    #[test]
    fn test_reshape_article_defaults() {
        let article = reshape_article(&json!({ "description": null, "image_url": null }), "tech");
        assert_eq!(article.id.len(), 36);
        assert_eq!(article.title, "No title");
        assert_eq!(article.description, "No description available");
        assert_eq!(article.url, "");
        assert_eq!(article.image, "");
        assert_eq!(article.source, "Unknown");
        assert_eq!(article.published, "");
        assert_eq!(article.category, "tech");
    }

    #[test]
    fn test_reshape_article_source_fallback() {
        let article = reshape_article(&json!({ "article_id": "x", "source_id": "bbc" }), "sports");
        assert_eq!(article.id, "x");
        assert_eq!(article.source, "bbc");
    }

    #[test]
    fn test_response_json_shape() {
        let value = serde_json::to_value(NewsResponse::success(Vec::new())).unwrap();
        assert_eq!(value, json!({ "articles": [], "status": "success" }));

        let value = serde_json::to_value(NewsResponse::error("boom")).unwrap();
        assert_eq!(value, json!({ "articles": [], "status": "error", "message": "boom" }));
    }

    #[test]
    fn test_request_language_defaults_to_english() {
        let request: NewsRequest = serde_json::from_value(json!({ "category": "tech" })).unwrap();
        assert_eq!(request.language, "en");
    }

    #[tokio::test]
    async fn test_fetch_news_maps_category_and_keeps_requested_one() {
        let addr = spawn_mock_upstream().await;
        let client = client_for(format!("http://{addr}/news"), Some("k3y"));

        let response = client.fetch_news("esports", "fr").await;
        assert_eq!(response.status, NewsStatus::Success);
        assert_eq!(response.message, None);
        assert_eq!(response.articles.len(), 2);

        let first = &response.articles[0];
        assert_eq!(first.id, "a1");
        assert_eq!(first.title, "technology in fr");
        assert_eq!(first.description, "No description available");
        assert_eq!(first.source, "Example");
        assert_eq!(first.category, "esports");

        assert_eq!(response.articles[1].title, "size=10 key=k3y");
        assert!(response.articles.iter().all(|a| a.category == "esports"));
    }

    #[tokio::test]
    async fn test_fetch_news_unknown_category_uses_general() {
        let addr = spawn_mock_upstream().await;
        let client = client_for(format!("http://{addr}/news"), None);

        let response = client.fetch_news("foo", "en").await;
        assert_eq!(response.status, NewsStatus::Success);
        assert_eq!(response.articles[0].title, "general in en");
        assert_eq!(response.articles[0].category, "foo");
        assert_eq!(response.articles[1].title, "size=10 key=");
    }

    #[tokio::test]
    async fn test_fetch_news_upstream_failure_is_soft() {
        let addr = spawn_mock_upstream().await;
        let client = client_for(format!("http://{addr}/failing"), None);

        let response = client.fetch_news("sports", "en").await;
        assert_eq!(response.status, NewsStatus::Error);
        assert!(response.articles.is_empty());
        assert!(response.message.unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_fetch_news_missing_results_is_empty_success() {
        let addr = spawn_mock_upstream().await;
        let client = client_for(format!("http://{addr}/empty"), None);

        let response = client.fetch_news("politics", "en").await;
        assert_eq!(response.status, NewsStatus::Success);
        assert!(response.articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_news_unreachable_upstream_is_soft() {
        // Grab a free port and close it again
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}/news"), None);
        let response = client.fetch_news("tech", "en").await;
        assert_eq!(response.status, NewsStatus::Error);
        assert!(response.articles.is_empty());
        assert!(response.message.is_some());
    }

    #[tokio::test]
    async fn test_fetch_news_timeout_is_soft() {
        let addr = spawn_mock_upstream().await;
        let client = NewsClient::new(&format!("http://{addr}/slow"), None, Duration::from_secs(1), 10).unwrap();

        let started = std::time::Instant::now();
        let response = client.fetch_news("tech", "en").await;
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(response.status, NewsStatus::Error);
        assert!(response.articles.is_empty());
        assert!(response.message.is_some());
    }
}
