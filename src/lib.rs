pub mod api_client;
pub mod app_state;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod kml_exporter;
pub mod logging;
pub mod map_surface;
pub mod notifications;
pub mod overlay_registry;
pub mod reset_controller;
pub mod result_renderer;
pub mod search_orchestrator;
