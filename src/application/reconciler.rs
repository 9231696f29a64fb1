// Snapshot reconciliation - merges a fetch outcome into previously held state
use crate::application::telemetry_client::FetchFailure;
use crate::domain::dashboard::DashboardData;
use crate::domain::site::Site;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Connectivity or server trouble; the next poll retries.
    #[error("Failed to fetch data from backend ({0})")]
    Unavailable(FetchFailure),
    #[error("{target} not found")]
    NotFound { target: String },
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound { .. })
    }
}

/// Result of one reconciliation: the data to hold and the error to surface, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    pub data: Option<T>,
    pub error: Option<SyncError>,
}

/// Full replacement on success, keep `previous` on transient failure, clear on `NotFound`.
pub fn reconcile<T>(
    previous: Option<T>,
    fetched: Result<T, FetchFailure>,
    target: &str,
) -> Reconciled<T> {
    match fetched {
        Ok(next) => Reconciled {
            data: Some(next),
            error: None,
        },
        Err(failure) if failure.is_transient() => Reconciled {
            data: previous,
            error: Some(SyncError::Unavailable(failure)),
        },
        Err(_) => Reconciled {
            data: None,
            error: Some(SyncError::NotFound {
                target: target.to_string(),
            }),
        },
    }
}

pub fn reconcile_sites(
    previous: Option<Arc<Vec<Site>>>,
    fetched: Result<Vec<Site>, FetchFailure>,
) -> Reconciled<Arc<Vec<Site>>> {
    reconcile(
        previous,
        fetched.map(|sites| Arc::new(dedupe_site_codes(sites))),
        "Site collection",
    )
}

pub fn reconcile_dashboard(
    previous: Option<Arc<DashboardData>>,
    fetched: Result<DashboardData, FetchFailure>,
    site_code: &str,
) -> Reconciled<Arc<DashboardData>> {
    reconcile(previous, fetched.map(Arc::new), &format!("Site {}", site_code))
}

/// Keep the first row for each `site_code`.
fn dedupe_site_codes(sites: Vec<Site>) -> Vec<Site> {
    let mut seen = HashSet::with_capacity(sites.len());
    let total = sites.len();
    let unique: Vec<Site> = sites
        .into_iter()
        .filter(|s| seen.insert(s.site_code.clone()))
        .collect();

    if unique.len() != total {
        tracing::warn!(
            "Dropped {} site rows with duplicate site_code",
            total - unique.len()
        );
    }
    unique
}
