mod app;
mod event_panel;
pub mod theme;
mod views;

pub use app::PlannerApp;
