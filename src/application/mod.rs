// Application layer - the live synchronization engine
pub mod detail_view;
pub mod directory_view;
pub mod reconciler;
pub mod scheduler;
pub mod site_service;
pub mod telemetry_client;
pub mod view_store;

#[cfg(test)]
pub(crate) mod testing;
