// Rust Planner Application
// Main entry point

use rust_planner::models::settings::Settings;
use rust_planner::services::settings::SettingsService;
use rust_planner::ui_egui::PlannerApp;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Rust Planner");

    let settings_service = SettingsService::default_path().map(SettingsService::new);
    let settings = match settings_service.as_ref() {
        Some(service) => PlannerApp::load_settings(service).unwrap_or_else(|err| {
            log::warn!("{:#}", err);
            Settings::default()
        }),
        None => {
            log::warn!("No config directory available, settings will not persist");
            Settings::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Rust Planner")
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rust Planner",
        options,
        Box::new(move |cc| Ok(Box::new(PlannerApp::new(cc, settings, settings_service)))),
    )
    .map_err(|err| anyhow::anyhow!("Planner window failed: {err}"))
}
