// View state store - loading/ready/error phase plus the latest reconciled data
use crate::application::reconciler::{Reconciled, SyncError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
    Error,
}

/// What a presentation surface renders: `(phase, data, error)`.
///
/// `data` may be stale while `phase` is `Error`; `error` is only set in that phase.
#[derive(Debug)]
pub struct ViewState<T> {
    pub phase: Phase,
    pub data: Option<Arc<T>>,
    pub error: Option<SyncError>,
    pub last_success: Option<DateTime<Utc>>,
}

impl<T> ViewState<T> {
    pub fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            data: None,
            error: None,
            last_success: None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            error: self.error.clone(),
            last_success: self.last_success,
        }
    }
}

pub struct ViewStore<T> {
    state: watch::Sender<ViewState<T>>,
}

impl<T: Send + Sync + 'static> ViewStore<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::loading());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    /// Reconcile against the current data and publish the outcome in one step.
    pub fn apply<F>(&self, reconcile: F)
    where
        F: FnOnce(Option<Arc<T>>) -> Reconciled<Arc<T>>,
    {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state.send_modify(|state| {
            let outcome = reconcile(state.data.clone());
            state.data = outcome.data;
            match outcome.error {
                None => {
                    state.phase = Phase::Ready;
                    state.error = None;
                    state.last_success = Some(Utc::now());
                }
                Some(error) => {
                    tracing::warn!("Poll failed: {}", error);
                    state.phase = Phase::Error;
                    state.error = Some(error);
                }
            }
        });
    }
}

impl<T: Send + Sync + 'static> Default for ViewStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::reconciler::reconcile;
    use crate::application::telemetry_client::FetchFailure;

    fn succeed(value: u32) -> impl FnOnce(Option<Arc<u32>>) -> Reconciled<Arc<u32>> {
        move |previous| reconcile(previous, Ok(Arc::new(value)), "counter")
    }

    fn fail(failure: FetchFailure) -> impl FnOnce(Option<Arc<u32>>) -> Reconciled<Arc<u32>> {
        move |previous| reconcile(previous, Err(failure), "counter")
    }

    #[test]
    fn test_starts_loading() {
        let store: ViewStore<u32> = ViewStore::new();
        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_ready_error_ready_cycle() {
        let store = ViewStore::new();

        store.apply(succeed(1));
        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.data.as_deref(), Some(&1));
        assert!(state.last_success.is_some());

        store.apply(succeed(2));
        assert_eq!(store.snapshot().data.as_deref(), Some(&2));

        store.apply(fail(FetchFailure::Server(503)));
        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.data.as_deref(), Some(&2));
        assert!(state.error_message().unwrap().contains("503"));

        store.apply(succeed(3));
        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.data.as_deref(), Some(&3));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_first_fetch_failure_shows_no_data() {
        let store = ViewStore::new();
        store.apply(fail(FetchFailure::Network("timed out".into())));

        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Error);
        assert!(state.data.is_none());
        assert!(state.last_success.is_none());
    }

    #[test]
    fn test_not_found_clears_data() {
        let store = ViewStore::new();
        store.apply(succeed(7));
        store.apply(fail(FetchFailure::NotFound));

        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Error);
        assert!(state.data.is_none());
        assert!(state.error.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = ViewStore::new();
        let mut rx = store.subscribe();

        store.apply(succeed(5));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().phase, Phase::Ready);
        assert_eq!(rx.borrow().data.as_deref(), Some(&5));
    }
}
