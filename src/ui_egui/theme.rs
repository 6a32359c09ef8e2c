//! Theme module for the planner window
//!
//! Defines the CalendarTheme palette used by the timeline painter and
//! applies it to the egui context.

use crate::models::settings::Settings;
use egui::Color32;

/// Colors used by the timeline view and the edit panel
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarTheme {
    /// Whether this is a dark theme (affects base egui::Visuals)
    pub is_dark: bool,

    /// Application background color
    pub app_background: Color32,

    /// Calendar grid background color
    pub calendar_background: Color32,

    /// Weekend day column background
    pub weekend_background: Color32,

    /// Today's header cell background
    pub today_background: Color32,

    /// Today's header cell border
    pub today_border: Color32,

    /// Hour and day separators
    pub grid_line: Color32,

    /// Primary text color (headings, dates)
    pub text_primary: Color32,

    /// Secondary text color (hour labels, weekdays)
    pub text_secondary: Color32,

    /// Current time line, dot and today segment
    pub indicator: Color32,

    /// Saved event block fill
    pub event_fill: Color32,

    /// Block fill while an event is being created
    pub event_creating_fill: Color32,

    /// Outline of the Active Event
    pub event_active_border: Color32,

    pub event_text: Color32,
}

impl CalendarTheme {
    /// Create the default Light theme
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            calendar_background: Color32::from_rgb(255, 255, 255),
            weekend_background: Color32::from_rgb(250, 250, 252),
            today_background: Color32::from_rgb(230, 240, 255),
            today_border: Color32::from_rgb(100, 150, 255),
            grid_line: Color32::from_rgb(225, 225, 225),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
            indicator: Color32::from_rgb(234, 67, 53),
            event_fill: Color32::from_rgb(66, 133, 244),
            event_creating_fill: Color32::from_rgba_unmultiplied(66, 133, 244, 140),
            event_active_border: Color32::from_rgb(25, 80, 180),
            event_text: Color32::WHITE,
        }
    }

    /// Create the default Dark theme
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(30, 30, 30),
            calendar_background: Color32::from_rgb(40, 40, 40),
            weekend_background: Color32::from_rgb(35, 35, 38),
            today_background: Color32::from_rgb(50, 60, 80),
            today_border: Color32::from_rgb(100, 150, 255),
            grid_line: Color32::from_rgb(60, 60, 60),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
            indicator: Color32::from_rgb(255, 100, 100),
            event_fill: Color32::from_rgb(70, 110, 190),
            event_creating_fill: Color32::from_rgba_unmultiplied(70, 110, 190, 140),
            event_active_border: Color32::from_rgb(160, 200, 255),
            event_text: Color32::from_rgb(240, 240, 240),
        }
    }

    pub fn for_settings(settings: &Settings) -> Self {
        if settings.is_dark_theme() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Apply this theme to an egui context
    pub fn apply_to_context(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.window_fill = self.app_background;
        visuals.panel_fill = self.app_background;
        visuals.widgets.hovered.bg_fill = self.today_background;
        visuals.widgets.active.bg_fill = self.today_background;
        visuals.override_text_color = Some(self.text_primary);

        ctx.set_visuals(visuals);
    }
}
