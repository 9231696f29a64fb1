// Telemetry client contract consumed by the sync engine
use crate::domain::dashboard::{DashboardData, HistoryPoint};
use crate::domain::site::Site;
use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with HTTP {0}")]
    Server(u16),
    #[error("resource not found")]
    NotFound,
}

impl FetchFailure {
    /// Transient failures are retried by the next poll; `NotFound` is authoritative.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchFailure::NotFound)
    }
}

#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// All sites with their latest telemetry
    async fn fetch_site_collection(&self) -> Result<Vec<Site>, FetchFailure>;

    async fn fetch_site(&self, site_code: &str) -> Result<Site, FetchFailure>;

    /// Dashboard payload for one site
    async fn fetch_dashboard(&self, site_code: &str) -> Result<DashboardData, FetchFailure>;

    /// Most recent `limit` history rows, newest first
    async fn fetch_history(
        &self,
        site_code: &str,
        limit: usize,
    ) -> Result<Vec<HistoryPoint>, FetchFailure>;
}
