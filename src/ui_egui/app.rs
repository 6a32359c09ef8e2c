mod lifecycle;
mod toolbar;

use crate::models::settings::Settings;
use crate::services::session::CalendarSession;
use crate::services::settings::SettingsService;
use crate::ui_egui::event_panel::EventPanelState;
use crate::ui_egui::theme::CalendarTheme;

pub struct PlannerApp {
    /// Persisted preferences
    settings: Settings,
    /// `None` when the platform has no config directory
    settings_service: Option<SettingsService>,
    /// Timeline state, scroll and interaction
    session: CalendarSession,
    /// Currently applied theme colors
    active_theme: CalendarTheme,
    /// Edit form buffers for the Active Event
    panel: EventPanelState,
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }
}
