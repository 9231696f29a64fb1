// Detail view - polls the dashboard of one bound site
use crate::application::reconciler::reconcile_dashboard;
use crate::application::scheduler::{PollConfig, PollScheduler};
use crate::application::telemetry_client::TelemetryClient;
use crate::application::view_store::{ViewState, ViewStore};
use crate::domain::dashboard::DashboardData;
use std::sync::Arc;
use tokio::sync::watch;

/// Store and scheduler for one site code. Dropping it stops the scheduler.
struct Binding {
    site_code: String,
    store: Arc<ViewStore<DashboardData>>,
    scheduler: PollScheduler,
}

pub struct DetailView {
    client: Arc<dyn TelemetryClient>,
    config: PollConfig,
    binding: Option<Binding>,
}

impl DetailView {
    pub fn new(client: Arc<dyn TelemetryClient>, config: PollConfig) -> Self {
        Self {
            client,
            config,
            binding: None,
        }
    }

    /// Point the view at `site_code`, returning a receiver for its state.
    ///
    /// The previous binding is stopped before the new one starts, so a late response
    /// for the old site can never land in the new store. Rebinding to the current
    /// site code keeps the running binding.
    pub fn bind(&mut self, site_code: &str) -> watch::Receiver<ViewState<DashboardData>> {
        if let Some(current) = &self.binding {
            if current.site_code == site_code {
                return current.store.subscribe();
            }
        }
        self.unbind();

        let store: Arc<ViewStore<DashboardData>> = Arc::new(ViewStore::new());
        let sink = store.clone();
        let client = self.client.clone();
        let fetch_code = site_code.to_string();
        let sink_code = site_code.to_string();

        let scheduler = PollScheduler::start(
            self.config,
            move || {
                let client = client.clone();
                let site_code = fetch_code.clone();
                async move { client.fetch_dashboard(&site_code).await }
            },
            move |fetched| sink.apply(|previous| reconcile_dashboard(previous, fetched, &sink_code)),
        );

        tracing::info!("Bound detail view to site {}", site_code);
        let rx = store.subscribe();
        self.binding = Some(Binding {
            site_code: site_code.to_string(),
            store,
            scheduler,
        });
        rx
    }

    /// Stop polling and discard the bound store. No-op when unbound.
    pub fn unbind(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.scheduler.stop();
            tracing::info!("Unbound detail view from site {}", binding.site_code);
        }
    }

    pub fn bound_site(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.site_code.as_str())
    }

    pub fn state(&self) -> Option<ViewState<DashboardData>> {
        self.binding.as_ref().map(|b| b.store.snapshot())
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<ViewState<DashboardData>>> {
        self.binding.as_ref().map(|b| b.store.subscribe())
    }
}
