use crate::models::event::{Event, EventId};
use crate::utils::date::{duration_label, format_12h, is_same_day, long_date};
use egui::RichText;

/// Form buffers for the Active Event.
#[derive(Debug, Default)]
pub struct EventPanelState {
    event_id: Option<EventId>,
    pub title: String,
    pub description: String,
}

/// Button pressed in the edit panel this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPanelAction {
    Save,
    Cancel,
    Delete,
}

impl EventPanelState {
    /// Reload the buffers when a different event becomes active or the
    /// active event changed outside the form (a revert on Cancel).
    pub fn sync(&mut self, active: Option<&Event>) {
        match active {
            Some(event)
                if self.event_id.as_ref() != Some(&event.id)
                    || self.title != event.title
                    || self.description != event.description =>
            {
                self.event_id = Some(event.id.clone());
                self.title = event.title.clone();
                self.description = event.description.clone();
            }
            Some(_) => {}
            None => *self = Self::default(),
        }
    }
}

pub fn panel_heading(is_dragging: bool) -> &'static str {
    if is_dragging {
        "Creating Event..."
    } else {
        "Edit Event"
    }
}

pub fn time_range_label(event: &Event) -> String {
    let (start, end) = event.normalized();
    if is_same_day(start, end) {
        format!("{} - {}", format_12h(start), format_12h(end))
    } else {
        format!(
            "{} - {}, {}",
            format_12h(start),
            long_date(end.date()),
            format_12h(end)
        )
    }
}

pub fn render_event_panel(
    ui: &mut egui::Ui,
    event: &Event,
    state: &mut EventPanelState,
    is_dragging: bool,
) -> Option<EventPanelAction> {
    let mut action = None;
    let (start, _) = event.normalized();

    ui.heading(panel_heading(is_dragging));
    ui.add_space(8.0);

    ui.label(RichText::new(long_date(start.date())).strong());
    ui.label(time_range_label(event));
    ui.label(RichText::new(duration_label(event.duration())).weak());
    ui.separator();

    ui.label("Title");
    ui.add(
        egui::TextEdit::singleline(&mut state.title)
            .hint_text("Add title")
            .desired_width(f32::INFINITY),
    );
    ui.add_space(4.0);
    ui.label("Description");
    ui.add(
        egui::TextEdit::multiline(&mut state.description)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    ui.add_enabled_ui(!is_dragging, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                action = Some(EventPanelAction::Save);
            }
            if ui.button("Cancel").clicked() {
                action = Some(EventPanelAction::Cancel);
            }
            if !event.is_temporary() && ui.button("🗑 Delete").clicked() {
                action = Some(EventPanelAction::Delete);
            }
        });
    });

    action
}
