// HTTP request handlers
use crate::application::telemetry_client::FetchFailure;
use crate::application::view_store::{Phase, ViewState};
use crate::domain::dashboard::{DashboardData, HistoryPoint};
use crate::domain::filter::{filter_by_region, FilterCounts, SiteFilter};
use crate::domain::site::{Severity, Site};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct SitesQuery {
    pub filter: Option<String>,
    pub region: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SiteView {
    #[serde(flatten)]
    pub site: Site,
    pub severity: Severity,
}

#[derive(Serialize)]
pub struct DirectoryResponse {
    pub phase: Phase,
    pub error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub counts: FilterCounts,
    pub sites: Vec<SiteView>,
}

/// Pushed over the event stream on every directory update.
#[derive(Serialize)]
pub struct DirectorySummary {
    pub phase: Phase,
    pub error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub counts: FilterCounts,
}

impl From<&ViewState<Vec<Site>>> for DirectorySummary {
    fn from(state: &ViewState<Vec<Site>>) -> Self {
        Self {
            phase: state.phase,
            error: state.error_message(),
            last_success: state.last_success,
            counts: state
                .data
                .as_deref()
                .map(Vec::as_slice)
                .map(FilterCounts::tally)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct DetailResponse {
    pub site_code: String,
    pub phase: Phase,
    pub error: Option<String>,
    pub not_found: bool,
    /// Where to send the user when there is nothing to show.
    pub recovery: Option<&'static str>,
    pub last_success: Option<DateTime<Utc>>,
    pub data: Option<DashboardData>,
}

impl DetailResponse {
    fn new(site_code: &str, state: ViewState<DashboardData>) -> Self {
        let recovery = match (state.phase, &state.data) {
            (Phase::Error, None) => Some("/sites"),
            _ => None,
        };
        Self {
            site_code: site_code.to_string(),
            phase: state.phase,
            error: state.error_message(),
            not_found: state.error.as_ref().is_some_and(|e| e.is_not_found()),
            recovery,
            last_success: state.last_success,
            data: state.data.as_deref().cloned(),
        }
    }
}

fn parse_filter(raw: &str) -> Result<SiteFilter, ApiError> {
    raw.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))
}

fn fetch_error(site_code: &str, failure: FetchFailure) -> ApiError {
    match failure {
        FetchFailure::NotFound => (
            StatusCode::NOT_FOUND,
            format!("No data available for site {}", site_code),
        ),
        other => {
            tracing::warn!("Lookup for site {} failed: {}", site_code, other);
            (StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Directory snapshot. `filter` overrides the selected filter for this request only.
pub async fn list_sites(
    Query(query): Query<SitesQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => parse_filter(raw)?,
        None => state.directory.selected_filter(),
    };

    let listing = state.directory.listing(filter);
    let sites = filter_by_region(
        listing.sites,
        query.region.as_deref().unwrap_or_default(),
    );

    Ok(Json(DirectoryResponse {
        phase: listing.state.phase,
        error: listing.state.error_message(),
        last_success: listing.state.last_success,
        counts: listing.counts,
        sites: sites
            .into_iter()
            .map(|site| SiteView {
                severity: site.severity(),
                site,
            })
            .collect(),
    }))
}

/// Change the directory's selected filter
pub async fn select_filter(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let filter = parse_filter(&name)?;
    state.directory.select_filter(filter);
    Ok(StatusCode::NO_CONTENT)
}

/// Server-sent events with a summary of every directory update.
/// The stream ends when the server starts shutting down.
pub async fn directory_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.directory.subscribe())
        .map(|view| {
            Event::default()
                .event("directory")
                .json_data(DirectorySummary::from(&view))
        })
        .take_until(state.shutdown.clone().cancelled_owned());
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn get_site(
    Path(site_code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SiteView>, ApiError> {
    let site = state
        .site_service
        .get_site(&site_code)
        .await
        .map_err(|e| fetch_error(&site_code, e))?;

    Ok(Json(SiteView {
        severity: site.severity(),
        site,
    }))
}

pub async fn get_history(
    Path(site_code): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryPoint>>, ApiError> {
    state
        .site_service
        .get_history(&site_code, query.limit)
        .await
        .map(Json)
        .map_err(|e| fetch_error(&site_code, e))
}

pub async fn get_detail(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DetailResponse>, ApiError> {
    let detail = state.detail.lock().await;
    match (detail.bound_site(), detail.state()) {
        (Some(site_code), Some(view)) => Ok(Json(DetailResponse::new(site_code, view))),
        _ => Err((StatusCode::NOT_FOUND, "No site selected".to_string())),
    }
}

pub async fn bind_detail(
    Path(site_code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<DetailResponse> {
    let mut detail = state.detail.lock().await;
    let rx = detail.bind(&site_code);
    let view = rx.borrow().clone();
    Json(DetailResponse::new(&site_code, view))
}

pub async fn unbind_detail(State(state): State<Arc<AppState>>) -> StatusCode {
    state.detail.lock().await.unbind();
    StatusCode::NO_CONTENT
}
