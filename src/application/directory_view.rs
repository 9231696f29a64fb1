// Directory view - polls the site collection and serves filtered subsets
use crate::application::reconciler::reconcile_sites;
use crate::application::scheduler::{PollConfig, PollScheduler};
use crate::application::telemetry_client::TelemetryClient;
use crate::application::view_store::{ViewState, ViewStore};
use crate::domain::filter::{filter_sites, FilterCounts, SiteFilter};
use crate::domain::site::Site;
use std::sync::Arc;
use tokio::sync::watch;

/// One read of the store: the state, the sites matching a filter, and the counts,
/// all taken from the same fetch.
pub struct DirectoryListing {
    pub state: ViewState<Vec<Site>>,
    pub sites: Vec<Site>,
    pub counts: FilterCounts,
}

pub struct DirectoryView {
    store: Arc<ViewStore<Vec<Site>>>,
    filter: watch::Sender<SiteFilter>,
    scheduler: PollScheduler,
}

impl DirectoryView {
    /// Create the store and start polling right away.
    pub fn activate(client: Arc<dyn TelemetryClient>, config: PollConfig) -> Self {
        let store: Arc<ViewStore<Vec<Site>>> = Arc::new(ViewStore::new());
        let sink = store.clone();

        let scheduler = PollScheduler::start(
            config,
            move || {
                let client = client.clone();
                async move { client.fetch_site_collection().await }
            },
            move |fetched| sink.apply(|previous| reconcile_sites(previous, fetched)),
        );

        tracing::info!("Directory polling started every {:?}", config.interval);

        Self {
            store,
            filter: watch::channel(SiteFilter::All).0,
            scheduler,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<Site>>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ViewState<Vec<Site>> {
        self.store.snapshot()
    }

    pub fn select_filter(&self, filter: SiteFilter) {
        self.filter.send_replace(filter);
    }

    pub fn selected_filter(&self) -> SiteFilter {
        *self.filter.borrow()
    }

    /// Sites matching the selected filter, from whatever data the store holds.
    pub fn visible_sites(&self) -> Vec<Site> {
        self.listing(self.selected_filter()).sites
    }

    /// Counts over the full collection; unaffected by the selected filter.
    pub fn counts(&self) -> FilterCounts {
        self.listing(SiteFilter::All).counts
    }

    /// Filter and tally a single snapshot, so a poll landing mid-read cannot
    /// pair sites from one fetch with counts from another.
    pub fn listing(&self, filter: SiteFilter) -> DirectoryListing {
        let state = self.store.snapshot();
        let (sites, counts) = match state.data.as_deref() {
            Some(all) => (filter_sites(all, filter), FilterCounts::tally(all)),
            None => (Vec::new(), FilterCounts::default()),
        };
        DirectoryListing {
            state,
            sites,
            counts,
        }
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn teardown(&self) {
        if self.scheduler.is_running() {
            tracing::info!("Directory polling stopped");
        }
        self.scheduler.stop();
    }
}
