use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
    pub requests_by_endpoint: HashMap<String, EndpointMetrics>,
}

#[derive(Debug, Clone)]
pub struct EndpointMetrics {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_response_time: Duration,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Endpoint key; item requests share the key `/item`.
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
    pub error_type: Option<String>,
}

impl ApiMetrics {
    pub fn average_response_time(&self) -> Duration {
        mean(self.total_response_time, self.total_requests)
    }

    /// Per-endpoint figures ordered by endpoint key.
    pub fn endpoints(&self) -> Vec<(&str, &EndpointMetrics)> {
        let mut endpoints: Vec<_> = self
            .requests_by_endpoint
            .iter()
            .map(|(endpoint, metrics)| (endpoint.as_str(), metrics))
            .collect();
        endpoints.sort_by_key(|(endpoint, _)| *endpoint);
        endpoints
    }
}

impl EndpointMetrics {
    fn new() -> Self {
        Self {
            request_count: 0,
            success_count: 0,
            error_count: 0,
            total_response_time: Duration::ZERO,
            min_response_time: Duration::MAX,
            max_response_time: Duration::ZERO,
        }
    }

    fn update(&mut self, metrics: &RequestMetrics) {
        self.request_count += 1;
        self.total_response_time = self.total_response_time.saturating_add(metrics.response_time);
        self.min_response_time = self.min_response_time.min(metrics.response_time);
        self.max_response_time = self.max_response_time.max(metrics.response_time);

        if metrics.success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn average_response_time(&self) -> Duration {
        mean(self.total_response_time, self.request_count)
    }

    pub fn success_rate(&self) -> f64 {
        if self.request_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.request_count as f64
        }
    }
}

#[derive(Debug)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<ApiMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(ApiMetrics::default())),
        }
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.last_request_time = Some(SystemTime::now());

        if request_metrics.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }

        metrics.total_response_time = metrics
            .total_response_time
            .saturating_add(request_metrics.response_time);

        metrics
            .requests_by_endpoint
            .entry(request_metrics.endpoint.clone())
            .or_insert_with(EndpointMetrics::new)
            .update(&request_metrics);
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(total: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos() / u128::from(count);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(endpoint: &str, millis: u64, success: bool) -> RequestMetrics {
        RequestMetrics {
            endpoint: endpoint.to_string(),
            status_code: Some(if success { 200 } else { 503 }),
            response_time: Duration::from_millis(millis),
            success,
            error_type: (!success).then(|| "remote_error".to_string()),
        }
    }

    #[tokio::test]
    async fn test_metrics_collection() {
        let collector = MetricsCollector::new();

        collector.record_request(request("/newstories", 150, true)).await;
        collector.record_request(request("/item", 50, false)).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.average_response_time(), Duration::from_millis(100));
        assert!(metrics.last_request_time.is_some());
    }

    #[tokio::test]
    async fn test_endpoint_metrics() {
        let collector = MetricsCollector::new();

        collector.record_request(request("/item", 100, true)).await;
        collector.record_request(request("/item", 300, true)).await;

        let snapshot = collector.get_metrics().await;
        let metrics = &snapshot.requests_by_endpoint["/item"];
        assert_eq!(metrics.request_count, 2);
        assert_eq!(metrics.success_rate(), 1.0);
        assert_eq!(metrics.min_response_time, Duration::from_millis(100));
        assert_eq!(metrics.max_response_time, Duration::from_millis(300));
        assert_eq!(metrics.average_response_time(), Duration::from_millis(200));

        assert!(!snapshot.requests_by_endpoint.contains_key("/topstories"));
    }

    #[tokio::test]
    async fn test_endpoints_are_listed_by_key() {
        let collector = MetricsCollector::new();
        collector.record_request(request("/newstories", 80, true)).await;
        collector.record_request(request("/item", 20, false)).await;
        collector.record_request(request("/item", 40, true)).await;
        collector.record_request(request("/jobstories", 60, true)).await;

        let snapshot = collector.get_metrics().await;
        let endpoints = snapshot.endpoints();
        let keys: Vec<&str> = endpoints.iter().map(|(endpoint, _)| *endpoint).collect();
        assert_eq!(keys, vec!["/item", "/jobstories", "/newstories"]);

        let (_, item) = endpoints[0];
        assert_eq!(item.success_rate(), 0.5);
        assert_eq!(item.average_response_time(), Duration::from_millis(30));
    }

    #[test]
    fn test_average_survives_counts_past_u32() {
        let count = u64::from(u32::MAX) + 1;
        let metrics = ApiMetrics {
            total_requests: count,
            total_response_time: Duration::from_nanos(3 * count),
            ..ApiMetrics::default()
        };
        assert_eq!(metrics.average_response_time(), Duration::from_nanos(3));

        let endpoint = EndpointMetrics {
            request_count: count,
            total_response_time: Duration::from_secs(count),
            ..EndpointMetrics::new()
        };
        assert_eq!(endpoint.average_response_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty_metrics_average_to_zero() {
        assert_eq!(ApiMetrics::default().average_response_time(), Duration::ZERO);
        assert_eq!(EndpointMetrics::new().average_response_time(), Duration::ZERO);
        assert_eq!(EndpointMetrics::new().success_rate(), 0.0);
    }
}
