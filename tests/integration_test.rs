// Integration tests for settings persistence and the calendar session
mod fixtures;

use fixtures::{ms, mounted_session, screen_pos, today};
use pretty_assertions::assert_eq;
use rust_planner::models::settings::Settings;
use rust_planner::services::date_range::CHUNK_SIZE;
use rust_planner::services::interaction::{
    InteractionKey, PointerButton, PointerTarget, ReleaseOutcome,
};
use rust_planner::services::settings::SettingsService;
use rust_planner::services::viewport::PageDirection;
use tempfile::TempDir;

#[test]
fn test_settings_persistence() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings_service = SettingsService::new(dir.path().join("settings.toml"));

    // Get default settings
    let mut settings = settings_service.get().expect("Failed to get settings");
    assert_eq!(settings.theme, "light");
    assert_eq!(settings.reference_timezone, "Asia/Kolkata");

    // Update settings to simulate UI changes
    settings.theme = "dark".to_string();
    settings.reference_timezone = "America/New_York".to_string();
    settings_service.update(&settings).expect("Failed to update settings");

    // Verify persistence by reading again
    let loaded = settings_service.get().expect("Failed to load settings");
    assert_eq!(loaded, settings);
    assert_eq!(
        SettingsService::reference_timezone(&loaded).unwrap(),
        chrono_tz::America::New_York
    );
}

#[test]
fn test_invalid_settings_are_not_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    let settings_service = SettingsService::new(&path);

    let settings = Settings {
        window_width: 100.0,
        ..Settings::default()
    };
    assert!(settings_service.update(&settings).is_err());
    assert!(!path.exists());
}

#[test]
fn test_mount_shows_today_and_current_time() {
    let session = mounted_session();

    assert_eq!(session.days().len(), 2 * CHUNK_SIZE + 1);
    assert_eq!(session.displayed_month_label(), "October 2026");
    assert_eq!(session.current_time_label(), "12:00");
    assert_eq!(session.indicator_offset(), 960.0);

    let segment = session.today_segment().expect("today is materialized");
    assert_eq!(session.days()[segment.day_index], today());
    let visible = session.scroll().visible_columns(session.days().len());
    assert!(visible.contains(&segment.day_index));
}

#[test]
fn test_create_save_move_and_delete_event() {
    let mut session = mounted_session();
    let index = session.today_segment().unwrap().day_index;

    // Drag from 09:00 to 11:00 on today's column.
    session.pointer_down(screen_pos(&session, index, 540.0), PointerButton::Primary);
    session.pointer_move(screen_pos(&session, index, 560.0));
    session.pointer_move(screen_pos(&session, index, 660.0));
    let ReleaseOutcome::Created(pending) = session.pointer_up() else {
        panic!("expected a pending event");
    };
    assert!(pending.id.is_temporary());
    assert_eq!(pending.start, today().and_hms_opt(9, 0, 0).unwrap());
    assert_eq!(pending.end, today().and_hms_opt(11, 0, 0).unwrap());
    assert!(session.events().is_empty());

    let saved = session.save_active("Standup", "Daily sync").unwrap();
    assert!(!saved.id.is_temporary());
    assert_eq!(session.events().len(), 1);
    assert!(session.active_event().is_none());

    // Grab the block at 10:00 and drop it an hour later.
    session.pointer_down(screen_pos(&session, index, 600.0), PointerButton::Primary);
    assert!(session.is_dragging());
    session.pointer_move(screen_pos(&session, index, 660.0));
    let ReleaseOutcome::Moved(moved) = session.pointer_up() else {
        panic!("expected a move");
    };
    assert_eq!(moved.start, today().and_hms_opt(10, 0, 0).unwrap());
    assert_eq!(session.events().get(&saved.id).unwrap().start, moved.start);

    // Delete while selected and not typing.
    session.key(InteractionKey::Delete, PointerTarget::Elsewhere);
    assert!(session.events().is_empty());
    assert!(session.active_event().is_none());
}

#[test]
fn test_click_away_discards_untitled_pending_event() {
    let mut session = mounted_session();
    let index = session.today_segment().unwrap().day_index;

    session.pointer_down(screen_pos(&session, index, 540.0), PointerButton::Primary);
    session.pointer_move(screen_pos(&session, index, 600.0));
    session.pointer_up();
    assert!(session.active_event().is_some());

    session.global_pointer_down(PointerTarget::EditPanel);
    assert!(session.active_event().is_some());

    session.global_pointer_down(PointerTarget::Elsewhere);
    assert!(session.active_event().is_none());
    assert!(session.events().is_empty());
}

#[test]
fn test_typed_title_survives_click_away_and_keys() {
    let mut session = mounted_session();
    let index = session.today_segment().unwrap().day_index;

    session.pointer_down(screen_pos(&session, index, 540.0), PointerButton::Primary);
    session.pointer_move(screen_pos(&session, index, 600.0));
    session.pointer_up();

    session.edit_active("Dentist", "");
    session.global_pointer_down(PointerTarget::Elsewhere);
    session.key(InteractionKey::Other, PointerTarget::Elsewhere);
    assert_eq!(
        session.active_event().map(|event| event.title.clone()),
        Some("Dentist".to_string())
    );

    // Saving keeps the typed title.
    let saved = session.save_active("Dentist", "").unwrap();
    assert_eq!(session.events().get(&saved.id).unwrap().title, "Dentist");
}

#[test]
fn test_any_key_elsewhere_discards_untitled_pending_event() {
    let mut session = mounted_session();
    let index = session.today_segment().unwrap().day_index;

    session.pointer_down(screen_pos(&session, index, 540.0), PointerButton::Primary);
    session.pointer_move(screen_pos(&session, index, 600.0));
    session.pointer_up();

    session.key(InteractionKey::Other, PointerTarget::EditPanel);
    assert!(session.active_event().is_some());
    session.key(InteractionKey::Other, PointerTarget::Elsewhere);
    assert!(session.active_event().is_none());
}

#[test]
fn test_header_catches_up_after_drag() {
    let mut session = mounted_session();
    let index = session.today_segment().unwrap().day_index;

    session.pointer_down(screen_pos(&session, index, 540.0), PointerButton::Primary);
    session.pointer_move(screen_pos(&session, index, 600.0));
    session.scroll_by(egui::Vec2::new(-600.0, 0.0), ms(10));
    assert_ne!(
        session.scroll().header_scroll_left(),
        session.scroll().scroll_left()
    );

    session.pointer_up();
    assert_eq!(
        session.scroll().header_scroll_left(),
        session.scroll().scroll_left()
    );
}

#[test]
fn test_page_at_the_edge_keeps_buttons_enabled() {
    let mut session = mounted_session();

    session.scroll_by(egui::Vec2::new(100_000.0, 0.0), ms(0));
    let edge = session.scroll().scroll_left();
    assert!(!session.page(PageDirection::Right, ms(10)));
    assert!(!session.is_animating());
    assert_eq!(session.scroll().scroll_left(), edge);
    assert!(session.page(PageDirection::Left, ms(20)));
}

#[test]
fn test_scrolling_near_the_start_loads_past_days() {
    let mut session = mounted_session();
    let first_before = session.days()[0];

    session.scroll_by(egui::Vec2::new(-100_000.0, 0.0), ms(10));
    session.tick(ms(200));

    assert_eq!(session.days().len(), 3 * CHUNK_SIZE + 1);
    assert_eq!(
        session.days()[CHUNK_SIZE],
        first_before,
        "old first day shifted right by one chunk"
    );
    assert!(session.is_loading() || session.scroll().is_locked());

    // The lock releases after the layout settles.
    session.tick(ms(500));
    assert!(!session.scroll().is_locked());
}

#[test]
fn test_page_buttons_wait_for_animation() {
    let mut session = mounted_session();
    assert!(session.page(PageDirection::Right, ms(0)));
    assert!(session.is_animating());
    assert!(!session.page(PageDirection::Right, ms(50)));
}
