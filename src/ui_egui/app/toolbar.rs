use super::PlannerApp;
use crate::services::viewport::PageDirection;
use std::time::Duration;

impl PlannerApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context, now: Duration) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::T)) {
            self.session.jump_to_today(now);
        }
    }

    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context, now: Duration) {
        let mut toggle_theme = false;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Today").on_hover_text("Ctrl+T").clicked() {
                    self.session.jump_to_today(now);
                }

                // Scroll buttons wait for the previous page animation.
                let idle = !self.session.is_animating();
                if ui
                    .add_enabled(idle, egui::Button::new("◀"))
                    .on_hover_text("Previous days")
                    .clicked()
                {
                    self.session.page(PageDirection::Left, now);
                }
                if ui
                    .add_enabled(idle, egui::Button::new("▶"))
                    .on_hover_text("Next days")
                    .clicked()
                {
                    self.session.page(PageDirection::Right, now);
                }

                ui.add_space(12.0);
                ui.heading(self.session.displayed_month_label());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.active_theme.is_dark { "☀" } else { "🌙" };
                    if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                        toggle_theme = true;
                    }
                    ui.label(format!(
                        "{} {}",
                        self.session.current_time_label(),
                        self.session.reference_timezone().name()
                    ));
                    if self.session.is_loading() {
                        ui.spinner();
                    }
                });
            });
        });

        if toggle_theme {
            self.toggle_theme(ctx);
        }
    }
}
