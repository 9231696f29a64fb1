// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    bind_detail, directory_events, get_detail, get_history, get_site, health_check, list_sites,
    select_filter, unbind_detail,
};
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sites", get(list_sites))
        .route("/sites/events", get(directory_events))
        .route("/sites/:code", get(get_site))
        .route("/sites/:code/history", get(get_history))
        .route("/filter/:name", put(select_filter))
        .route("/detail", get(get_detail).delete(unbind_detail))
        .route("/detail/:code", put(bind_detail))
        .with_state(state)
}
