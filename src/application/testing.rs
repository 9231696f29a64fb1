// In-memory telemetry client for tests
use crate::application::telemetry_client::{FetchFailure, TelemetryClient};
use crate::domain::dashboard::{DashboardData, HistoryPoint, SiteInfo};
use crate::domain::site::Site;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn site(code: &str, is_active: bool, status: &str) -> Site {
    Site {
        site_code: code.to_string(),
        site_name: format!("{} Site", code),
        is_active,
        latest_status: status.to_string(),
        ..Default::default()
    }
}

pub(crate) fn dashboard(code: &str) -> DashboardData {
    DashboardData {
        site_info: SiteInfo {
            site_code: code.to_string(),
            site_name: format!("{} Site", code),
            project_id: format!("PRJ-{}", code),
            last_data: "2025-01-02 03:04:05".to_string(),
            extra: Default::default(),
        },
        environment: serde_json::json!({ "temperature": 27.0 }),
        modules: serde_json::json!([]),
        rectifier: serde_json::json!({ "vdcOutput": 53.5 }),
        battery: serde_json::json!({ "banks": [] }),
    }
}

#[derive(Default)]
pub(crate) struct FakeClient {
    sites: Mutex<Option<Result<Vec<Site>, FetchFailure>>>,
    dashboards: Mutex<HashMap<String, Result<DashboardData, FetchFailure>>>,
    history: Mutex<HashMap<String, Vec<HistoryPoint>>>,
    delays: Mutex<HashMap<String, Duration>>,
    collection_calls: AtomicUsize,
    dashboard_calls: AtomicUsize,
}

impl FakeClient {
    pub(crate) fn set_sites(&self, sites: Result<Vec<Site>, FetchFailure>) {
        *self.sites.lock().unwrap() = Some(sites);
    }

    pub(crate) fn set_dashboard(&self, code: &str, data: Result<DashboardData, FetchFailure>) {
        self.dashboards.lock().unwrap().insert(code.to_string(), data);
    }

    pub(crate) fn set_history(&self, code: &str, points: Vec<HistoryPoint>) {
        self.history.lock().unwrap().insert(code.to_string(), points);
    }

    /// Make every dashboard fetch for `code` take `delay`.
    pub(crate) fn set_delay(&self, code: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(code.to_string(), delay);
    }

    pub(crate) fn collection_calls(&self) -> usize {
        self.collection_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TelemetryClient for FakeClient {
    async fn fetch_site_collection(&self) -> Result<Vec<Site>, FetchFailure> {
        self.collection_calls.fetch_add(1, Ordering::SeqCst);
        let sites = self.sites.lock().unwrap().clone();
        sites.unwrap_or_else(|| Err(FetchFailure::Network("no collection configured".into())))
    }

    async fn fetch_site(&self, site_code: &str) -> Result<Site, FetchFailure> {
        let sites = self.sites.lock().unwrap().clone();
        match sites {
            Some(Ok(sites)) => sites
                .into_iter()
                .find(|s| s.site_code == site_code)
                .ok_or(FetchFailure::NotFound),
            Some(Err(failure)) => Err(failure),
            None => Err(FetchFailure::NotFound),
        }
    }

    async fn fetch_dashboard(&self, site_code: &str) -> Result<DashboardData, FetchFailure> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(site_code).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let data = self.dashboards.lock().unwrap().get(site_code).cloned();
        data.unwrap_or(Err(FetchFailure::NotFound))
    }

    async fn fetch_history(
        &self,
        site_code: &str,
        limit: usize,
    ) -> Result<Vec<HistoryPoint>, FetchFailure> {
        let history = self.history.lock().unwrap();
        let points = history.get(site_code).ok_or(FetchFailure::NotFound)?;
        Ok(points.iter().take(limit).cloned().collect())
    }
}
