// Presentation layer - HTTP surface over the directory and detail views
pub mod app_state;
pub mod handlers;
pub mod router;
