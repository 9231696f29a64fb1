// REST telemetry client implementation
use crate::application::telemetry_client::{FetchFailure, TelemetryClient};
use crate::domain::dashboard::{DashboardData, HistoryPoint};
use crate::domain::site::Site;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The source API refuses to return more history rows than this.
const MAX_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct RestTelemetryClient {
    base_url: String,
    http: reqwest::Client,
}

impl RestTelemetryClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn sites_url(&self) -> String {
        format!("{}/sites/", self.base_url)
    }

    fn site_url(&self, site_code: &str, suffix: &str) -> String {
        format!(
            "{}/sites/{}/{}",
            self.base_url,
            urlencoding::encode(site_code),
            suffix
        )
    }

    fn history_url(&self, site_code: &str, limit: usize) -> String {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        format!("{}?limit={}", self.site_url(site_code, "history/"), limit)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchFailure> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchFailure::NotFound);
        }
        if !status.is_success() {
            tracing::warn!("Telemetry API {} responded with {}", url, status);
            return Err(FetchFailure::Server(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse telemetry response from {}: {}", url, e);
            FetchFailure::Network(format!("invalid response body: {}", e))
        })
    }
}

#[async_trait]
impl TelemetryClient for RestTelemetryClient {
    async fn fetch_site_collection(&self) -> Result<Vec<Site>, FetchFailure> {
        self.get_json(&self.sites_url()).await
    }

    async fn fetch_site(&self, site_code: &str) -> Result<Site, FetchFailure> {
        self.get_json(&self.site_url(site_code, "")).await
    }

    async fn fetch_dashboard(&self, site_code: &str) -> Result<DashboardData, FetchFailure> {
        self.get_json(&self.site_url(site_code, "dashboard/")).await
    }

    async fn fetch_history(
        &self,
        site_code: &str,
        limit: usize,
    ) -> Result<Vec<HistoryPoint>, FetchFailure> {
        self.get_json(&self.history_url(site_code, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RestTelemetryClient {
        RestTelemetryClient::new("http://10.0.0.5:3000/api/".to_string(), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(client.sites_url(), "http://10.0.0.5:3000/api/sites/");
        assert_eq!(client.site_url("NYK", ""), "http://10.0.0.5:3000/api/sites/NYK/");
        assert_eq!(
            client.site_url("NYK", "dashboard/"),
            "http://10.0.0.5:3000/api/sites/NYK/dashboard/"
        );
    }

    #[test]
    fn test_site_code_is_encoded() {
        assert_eq!(
            client().site_url("A B/1", ""),
            "http://10.0.0.5:3000/api/sites/A%20B%2F1/"
        );
    }

    #[test]
    fn test_history_limit_clamped() {
        let client = client();
        assert_eq!(
            client.history_url("NYK", 50),
            "http://10.0.0.5:3000/api/sites/NYK/history/?limit=50"
        );
        assert!(client.history_url("NYK", 5000).ends_with("?limit=1000"));
        assert!(client.history_url("NYK", 0).ends_with("?limit=1"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        // Nothing listens on port 9 of the loopback interface.
        let client =
            RestTelemetryClient::new("http://127.0.0.1:9/api".to_string(), Duration::from_secs(2))
                .unwrap();
        let result = client.fetch_site_collection().await;
        assert!(matches!(result, Err(FetchFailure::Network(_))));
    }
}
