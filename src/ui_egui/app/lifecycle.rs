use super::PlannerApp;
use crate::models::settings::{Settings, DEFAULT_REFERENCE_TIMEZONE};
use crate::services::session::CalendarSession;
use crate::services::settings::SettingsService;
use crate::services::timeline::SystemClock;
use crate::ui_egui::event_panel::{render_event_panel, EventPanelAction};
use crate::ui_egui::theme::CalendarTheme;
use crate::ui_egui::views::timeline_view::render_timeline;
use anyhow::Context as _;
use chrono::Local;
use std::time::Duration;

const EVENT_PANEL_WIDTH: f32 = 300.0;

impl PlannerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        settings_service: Option<SettingsService>,
    ) -> Self {
        let timezone = SettingsService::reference_timezone(&settings).unwrap_or_else(|err| {
            log::warn!("{}, falling back to {}", err, DEFAULT_REFERENCE_TIMEZONE);
            chrono_tz::Asia::Kolkata
        });
        log::info!("Current time follows {}", timezone);

        let session = CalendarSession::new(Local::now().date_naive(), Box::new(SystemClock), timezone);
        let active_theme = CalendarTheme::for_settings(&settings);
        active_theme.apply_to_context(&cc.egui_ctx);

        Self {
            settings,
            settings_service,
            session,
            active_theme,
            panel: Default::default(),
        }
    }

    /// Read persisted settings from `service`.
    pub fn load_settings(service: &SettingsService) -> anyhow::Result<Settings> {
        service
            .get()
            .with_context(|| format!("Failed to load settings from {:?}", service.path()))
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = session_time(ctx);
        self.session.tick(now);

        self.handle_keyboard_shortcuts(ctx, now);
        self.render_toolbar(ctx, now);
        let panel_rect = self.show_event_panel(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                render_timeline(ui, &mut self.session, &self.active_theme, now, panel_rect);
            });

        self.schedule_repaint(ctx, now);
    }

    /// Edit panel for the Active Event. Returns its screen rectangle.
    fn show_event_panel(&mut self, ctx: &egui::Context) -> Option<egui::Rect> {
        self.panel.sync(self.session.active_event());
        let event = self.session.active_event()?.clone();
        let is_dragging = self.session.is_dragging();

        let response = egui::SidePanel::right("event_panel")
            .resizable(false)
            .exact_width(EVENT_PANEL_WIDTH)
            .show(ctx, |ui| render_event_panel(ui, &event, &mut self.panel, is_dragging));

        match response.inner {
            Some(EventPanelAction::Save) => {
                if let Some(saved) = self
                    .session
                    .save_active(&self.panel.title, &self.panel.description)
                {
                    log::info!("Saved event {} ({})", saved.id, saved.title);
                }
            }
            Some(EventPanelAction::Cancel) => self.session.cancel_active(),
            Some(EventPanelAction::Delete) => {
                if self.session.delete_active() {
                    log::info!("Deleted event {}", event.id);
                }
            }
            None => self
                .session
                .edit_active(&self.panel.title, &self.panel.description),
        }
        Some(response.response.rect)
    }

    pub(super) fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.settings.theme = if self.active_theme.is_dark { "light" } else { "dark" }.to_string();
        self.active_theme = CalendarTheme::for_settings(&self.settings);
        self.active_theme.apply_to_context(ctx);

        if let Some(service) = &self.settings_service {
            if let Err(err) = service.update(&self.settings) {
                log::error!("Failed to save settings: {}", err);
            }
        }
    }

    /// Keep frames coming while something moves, otherwise wake up for the
    /// next deferred task.
    fn schedule_repaint(&self, ctx: &egui::Context, now: Duration) {
        if self.session.needs_animation_frame() || self.session.is_dragging() {
            ctx.request_repaint();
        } else if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_sub(now));
        }
    }
}

/// Time since the window opened, as seen by egui.
fn session_time(ctx: &egui::Context) -> Duration {
    Duration::from_secs_f64(ctx.input(|i| i.time).max(0.0))
}
