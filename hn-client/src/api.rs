use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use async_trait::async_trait;
use heronews_core::{CoreError, FeedConfig, HnApiError, Item, ItemId, StoryList};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Read-only access to the upstream Hacker News API.
#[async_trait]
pub trait HackerNewsApi: Send + Sync {
    /// Fetches one item. `Ok(None)` means the API answered `null`.
    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>, CoreError>;

    /// Fetches an ordered identifier list.
    async fn fetch_story_ids(&self, list: StoryList) -> Result<Vec<ItemId>, CoreError>;
}

#[derive(Debug)]
pub struct HackerNewsClient {
    http_client: Client,
    base_url: String,
    metrics: Arc<MetricsCollector>,
}

impl HackerNewsClient {
    pub fn new(config: &FeedConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base().to_string(),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// Client with default settings against a different API root.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let config = FeedConfig {
            base_url: base_url.into(),
            ..FeedConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn make_request(&self, path: &str, metrics_key: &str) -> Result<Response, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        let start_time = Instant::now();

        debug!("Making Hacker News API request: GET {}", path);
        let outcome = match self.http_client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Request successful: {} {}", response.status(), path);
                Ok(response)
            }
            Ok(response) => {
                let status = response.status().as_u16();
                error!("Request failed with status: {} for {}", status, path);
                Err(CoreError::HnApi(HnApiError::Remote {
                    status,
                    endpoint: path.to_string(),
                }))
            }
            Err(e) if e.is_timeout() => {
                warn!("Request timed out for {}", path);
                Err(CoreError::HnApi(HnApiError::RequestTimeout))
            }
            Err(e) => {
                error!("Network error for {}: {}", path, e);
                Err(CoreError::Network(e))
            }
        };

        let (status_code, error_type) = match &outcome {
            Ok(response) => (Some(response.status().as_u16()), None),
            Err(CoreError::HnApi(HnApiError::Remote { status, .. })) => {
                (Some(*status), Some("remote_error".to_string()))
            }
            Err(CoreError::HnApi(HnApiError::RequestTimeout)) => {
                (None, Some("timeout".to_string()))
            }
            Err(_) => (None, Some("network_error".to_string())),
        };

        self.metrics
            .record_request(RequestMetrics {
                endpoint: metrics_key.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success: outcome.is_ok(),
                error_type,
            })
            .await;

        outcome
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }
}

#[async_trait]
impl HackerNewsApi for HackerNewsClient {
    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>, CoreError> {
        let path = format!("/item/{}.json", id);
        let response = self.make_request(&path, "/item").await?;

        let item: Option<Item> = response.json().await.map_err(|e| {
            error!("Failed to parse item {}: {}", id, e);
            CoreError::HnApi(HnApiError::MalformedResponse {
                details: format!("Failed to parse item {}", id),
            })
        })?;

        if item.is_none() {
            debug!("Item {} resolved to null", id);
        }
        Ok(item)
    }

    async fn fetch_story_ids(&self, list: StoryList) -> Result<Vec<ItemId>, CoreError> {
        let key = format!("/{}", list.endpoint());
        let path = format!("{}.json", key);
        let response = self.make_request(&path, &key).await?;

        let ids: Vec<ItemId> = response.json().await.map_err(|e| {
            error!("Failed to parse {} list: {}", list.endpoint(), e);
            CoreError::HnApi(HnApiError::MalformedResponse {
                details: format!("Failed to parse {} list", list.endpoint()),
            })
        })?;

        info!("Retrieved {} ids from {}", ids.len(), list.endpoint());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_client_creation() {
        let client = HackerNewsClient::new(&FeedConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://hacker-news.firebaseio.com/v0");

        let metrics = client.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HackerNewsClient::with_base_url("http://127.0.0.1:1/v0/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1/v0");
    }
}
