// Application state for HTTP handlers
use crate::application::detail_view::DetailView;
use crate::application::directory_view::DirectoryView;
use crate::application::site_service::SiteService;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub directory: DirectoryView,
    pub detail: Mutex<DetailView>,
    pub site_service: SiteService,
    /// Cancelled once graceful shutdown begins; ends long-lived streams.
    pub shutdown: CancellationToken,
}
