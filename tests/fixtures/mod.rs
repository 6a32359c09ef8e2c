// Test fixtures - reusable test data
// Provides a fixed clock and a laid-out session across test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use egui::{Pos2, Rect, Vec2};
use rust_planner::services::geometry::{column_left, y_for_minutes};
use rust_planner::services::session::CalendarSession;
use rust_planner::services::timeline::Clock;
use std::time::Duration;

/// Clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Mon Oct 19 2026, the session's "today"
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// 06:30 UTC, which is 12:00 in Asia/Kolkata
pub fn noon_in_kolkata() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap()
}

/// Grid element below a 100px header, time column included
pub fn viewport() -> Rect {
    Rect::from_min_size(Pos2::new(0.0, 100.0), Vec2::new(960.0, 600.0))
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Session laid out in `viewport()` and mounted at t = 0.
pub fn mounted_session() -> CalendarSession {
    let mut session = CalendarSession::new(
        today(),
        Box::new(FixedClock(noon_in_kolkata())),
        chrono_tz::Asia::Kolkata,
    );
    session.set_viewport(viewport());
    session.mount(Duration::ZERO);
    session
}

/// Screen position of `minutes` past midnight, 10px into day column `index`.
pub fn screen_pos(session: &CalendarSession, index: usize, minutes: f32) -> Pos2 {
    let content = Rect::from_min_size(
        Pos2::new(column_left(index) + 10.0, y_for_minutes(minutes)),
        Vec2::ZERO,
    );
    session.geometry().to_screen(content).min
}
