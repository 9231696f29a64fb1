// Site service - one-shot lookups that bypass the polling views
use crate::application::telemetry_client::{FetchFailure, TelemetryClient, DEFAULT_HISTORY_LIMIT};
use crate::domain::dashboard::HistoryPoint;
use crate::domain::site::Site;
use std::sync::Arc;

#[derive(Clone)]
pub struct SiteService {
    client: Arc<dyn TelemetryClient>,
}

impl SiteService {
    pub fn new(client: Arc<dyn TelemetryClient>) -> Self {
        Self { client }
    }

    pub async fn get_site(&self, site_code: &str) -> Result<Site, FetchFailure> {
        self.client.fetch_site(site_code).await
    }

    pub async fn get_history(
        &self,
        site_code: &str,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryPoint>, FetchFailure> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.client.fetch_history(site_code, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{site, FakeClient};

    #[tokio::test]
    async fn test_history_defaults_to_fifty_points() {
        let client = Arc::new(FakeClient::default());
        let points = (0..80)
            .map(|i| HistoryPoint(serde_json::json!({ "timestamp": i })))
            .collect();
        client.set_history("NYK", points);

        let service = SiteService::new(client);
        assert_eq!(service.get_history("NYK", None).await.unwrap().len(), 50);
        assert_eq!(service.get_history("NYK", Some(5)).await.unwrap().len(), 5);
        assert_eq!(service.get_history("JKT", None).await, Err(FetchFailure::NotFound));
    }

    #[tokio::test]
    async fn test_get_site() {
        let client = Arc::new(FakeClient::default());
        client.set_sites(Ok(vec![site("NYK", true, "Normal")]));

        let service = SiteService::new(client);
        assert_eq!(service.get_site("NYK").await.unwrap().site_code, "NYK");
        assert_eq!(service.get_site("SBY").await, Err(FetchFailure::NotFound));
    }
}
