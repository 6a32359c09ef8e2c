//! Calendar view session.
//!
//! One instance per calendar view. It owns the day range, the event store,
//! the scroll controller, the "now" indicator, the interaction state machine
//! and the deferred tasks, and routes presentation input between them.
//! Time is passed in as an offset from session start so the presentation
//! layer decides what clock drives it.

use chrono::NaiveDate;
use chrono_tz::Tz;
use egui::{Pos2, Rect, Vec2};
use std::time::Duration;

use crate::models::event::Event;
use crate::services::date_range::{DateRangeStore, ExtendDirection};
use crate::services::event_store::EventStore;
use crate::services::geometry::{EventBlock, GridGeometry, TIME_COLUMN_WIDTH};
use crate::services::interaction::{
    EventInteraction, InteractionKey, PointerButton, PointerTarget, ReleaseOutcome,
};
use crate::services::scheduler::{TaskKey, TaskScheduler};
use crate::services::timeline::{Clock, TimelineIndicator, TodaySegment};
use crate::services::viewport::{PageDirection, ScrollController};
use crate::utils::date::month_year_label;

pub const INDICATOR_REFRESH: Duration = Duration::from_secs(60);

fn grid_geometry<'a>(
    viewport: Rect,
    scroll: &ScrollController,
    dates: &'a DateRangeStore,
) -> GridGeometry<'a> {
    GridGeometry::new(viewport, scroll.scroll_left(), scroll.scroll_top(), dates.days())
}

/// Stored events first, then the Active Event on top. A stored event that is
/// currently active is drawn from the active copy only.
fn layout_blocks(
    geometry: &GridGeometry<'_>,
    events: &EventStore,
    active: Option<&Event>,
) -> Vec<EventBlock> {
    let mut blocks: Vec<EventBlock> = events
        .events()
        .iter()
        .filter(|event| active.map_or(true, |active| active.id != event.id))
        .flat_map(|event| geometry.blocks_for(event, false))
        .collect();
    if let Some(active) = active {
        blocks.extend(geometry.blocks_for(active, true));
    }
    blocks
}

pub struct CalendarSession {
    today: NaiveDate,
    dates: DateRangeStore,
    events: EventStore,
    scroll: ScrollController,
    indicator: TimelineIndicator,
    interaction: EventInteraction,
    scheduler: TaskScheduler,
    viewport: Rect,
    mounted: bool,
}

impl CalendarSession {
    pub fn new(today: NaiveDate, clock: Box<dyn Clock>, timezone: Tz) -> Self {
        let dates = DateRangeStore::centered_on(today);
        let scroll = ScrollController::new(today, dates.len());
        Self {
            today,
            dates,
            events: EventStore::new(),
            scroll,
            indicator: TimelineIndicator::new(clock, timezone),
            interaction: EventInteraction::new(),
            scheduler: TaskScheduler::new(),
            viewport: Rect::NOTHING,
            mounted: false,
        }
    }

    // --- Exposed to the presentation layer -------------------------------

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn days(&self) -> &[NaiveDate] {
        self.dates.days()
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn active_event(&self) -> Option<&Event> {
        self.interaction.active()
    }

    pub fn interaction(&self) -> &EventInteraction {
        &self.interaction
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    pub fn is_loading(&self) -> bool {
        self.scroll.is_loading()
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn geometry(&self) -> GridGeometry<'_> {
        grid_geometry(self.viewport, &self.scroll, &self.dates)
    }

    pub fn event_blocks(&self) -> Vec<EventBlock> {
        layout_blocks(&self.geometry(), &self.events, self.interaction.active())
    }

    pub fn indicator_offset(&self) -> f32 {
        self.indicator.offset()
    }

    pub fn current_time_label(&self) -> &str {
        self.indicator.display_time()
    }

    pub fn reference_timezone(&self) -> Tz {
        self.indicator.timezone()
    }

    pub fn indicator_line_width(&self) -> f32 {
        self.indicator.line_width(self.dates.days())
    }

    pub fn today_segment(&self) -> Option<TodaySegment> {
        self.indicator.today_segment(self.dates.days(), self.today)
    }

    pub fn displayed_month_label(&self) -> String {
        month_year_label(self.scroll.displayed_date())
    }

    /// Earliest pending deferred task or animation frame.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn needs_animation_frame(&self) -> bool {
        self.scroll.has_animation()
    }

    // --- Lifecycle --------------------------------------------------------

    /// Record the grid element's screen rectangle (time column included).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.scroll
            .set_client_size(viewport.width() - TIME_COLUMN_WIDTH, viewport.height());
    }

    /// First layout: center on today and the current time, start the
    /// indicator refresh.
    pub fn mount(&mut self, now: Duration) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let offset = self.indicator.refresh();
        if let Some(index) = self.dates.index_of(self.today) {
            self.scroll.center_on(index, offset);
        }
        self.scroll
            .on_scroll(self.dates.days(), now, &mut self.scheduler, false);
        self.scheduler
            .schedule(TaskKey::IndicatorRefresh, now, INDICATOR_REFRESH);
        log::info!(
            "Calendar session mounted on {} ({} days materialized)",
            self.today,
            self.dates.len()
        );
    }

    /// Advance animations and run every deferred task due at `now`.
    pub fn tick(&mut self, now: Duration) {
        if self.scroll.tick_animation(now) {
            self.handle_scroll(now);
        }

        for key in self.scheduler.take_due(now) {
            match key {
                TaskKey::ScrollSettle => self.settle(now),
                TaskKey::LockRelease => self.scroll.release_lock(),
                TaskKey::IndicatorRefresh => {
                    self.indicator.refresh();
                    self.today = self.indicator.local_date();
                    self.scheduler
                        .schedule(TaskKey::IndicatorRefresh, now, INDICATOR_REFRESH);
                }
                TaskKey::WheelDebounce => {}
            }
        }
    }

    fn handle_scroll(&mut self, now: Duration) {
        let drag_active = self.interaction.is_dragging();
        if let Some(date) =
            self.scroll
                .on_scroll(self.dates.days(), now, &mut self.scheduler, drag_active)
        {
            log::debug!("Displayed month is now {}", month_year_label(date));
        }
    }

    fn settle(&mut self, now: Duration) {
        let Some(direction) = self.scroll.on_settle(self.interaction.is_dragging()) else {
            return;
        };
        let added = self.dates.extend(direction);
        log::info!(
            "Loaded {} {} days",
            added.len(),
            match direction {
                ExtendDirection::Prepend => "past",
                ExtendDirection::Append => "future",
            }
        );
        self.scroll
            .after_layout(self.dates.len(), now, &mut self.scheduler);
    }

    // --- Scroll input -----------------------------------------------------

    /// Free scroll (trackpad, scrollbars).
    pub fn scroll_by(&mut self, delta: Vec2, now: Duration) {
        if self.scroll.scroll_by(delta) {
            self.handle_scroll(now);
        }
    }

    /// Mouse wheel tick. Returns whether it was consumed as a column step.
    pub fn wheel(&mut self, delta_y: f32, shift: bool, now: Duration) -> bool {
        self.scroll.on_wheel(delta_y, shift, now, &mut self.scheduler)
    }

    /// Scroll button press.
    pub fn page(&mut self, direction: PageDirection, now: Duration) -> bool {
        self.scroll.page(direction, now)
    }

    pub fn jump_to_today(&mut self, now: Duration) {
        let offset = self.indicator.refresh();
        match self.dates.index_of(self.today) {
            Some(index) => self.scroll.jump_to(index, offset, now),
            None => log::warn!("Today ({}) is outside the loaded range", self.today),
        }
    }

    // --- Pointer and keyboard input ---------------------------------------

    pub fn pointer_down(&mut self, pos: Pos2, button: PointerButton) {
        let geometry = grid_geometry(self.viewport, &self.scroll, &self.dates);
        let blocks = layout_blocks(&geometry, &self.events, self.interaction.active());
        self.interaction
            .pointer_down(pos, button, &geometry, &blocks, &self.events);
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let geometry = grid_geometry(self.viewport, &self.scroll, &self.dates);
        self.interaction.pointer_move(pos, &geometry);
    }

    pub fn pointer_up(&mut self) -> ReleaseOutcome {
        let was_dragging = self.interaction.is_dragging();
        let outcome = self.interaction.pointer_up(&mut self.events);
        if was_dragging {
            self.scroll.sync_header();
        }
        outcome
    }

    /// Pointer-down outside the grid element.
    pub fn global_pointer_down(&mut self, target: PointerTarget) {
        self.interaction.on_global_pointer_down(target);
    }

    pub fn key(&mut self, key: InteractionKey, target: PointerTarget) {
        self.interaction.on_key(key, target, &mut self.events);
    }

    /// Mirror the edit form fields into the Active Event.
    pub fn edit_active(&mut self, title: &str, description: &str) {
        self.interaction.edit_fields(title, description);
    }

    pub fn save_active(&mut self, title: &str, description: &str) -> Option<Event> {
        self.interaction.save(title, description, &mut self.events)
    }

    pub fn cancel_active(&mut self) {
        self.interaction.cancel(&self.events);
    }

    pub fn delete_active(&mut self) -> bool {
        self.interaction.delete_active(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::date_range::CHUNK_SIZE;
    use crate::services::geometry::{column_left, y_for_minutes, DAY_COLUMN_WIDTH};
    use crate::services::timeline::MockClock;
    use crate::services::viewport::LOAD_THRESHOLD;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn session() -> CalendarSession {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .return_const(Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap());
        let mut session = CalendarSession::new(today(), Box::new(clock), chrono_tz::UTC);
        session.set_viewport(Rect::from_min_size(Pos2::new(0.0, 100.0), Vec2::new(960.0, 600.0)));
        session
    }

    #[test]
    fn test_mount_centers_on_today_and_now() {
        let mut session = session();
        session.mount(ms(0));

        let index = session.days().iter().position(|d| *d == today()).unwrap();
        assert_eq!(column_left(index) - session.scroll().scroll_left(), DAY_COLUMN_WIDTH);
        assert_eq!(session.scroll().scroll_top(), 6.5 * 80.0 - 300.0);
        assert_eq!(session.current_time_label(), "06:30");
        assert_eq!(session.displayed_month_label(), "October 2026");
        assert!(session.today_segment().is_some());
    }

    #[test]
    fn test_prepend_then_append_shifts_today_index() {
        let mut session = session();
        session.mount(ms(0));
        let mut now = 0;

        for _ in 0..2 {
            session.scroll_by(Vec2::new(-100_000.0, 0.0), ms(now));
            now += 200;
            session.tick(ms(now));
            assert!(session.scroll().is_locked());
            now += 250;
            session.tick(ms(now));
            assert!(!session.scroll().is_locked());
        }
        session.scroll_by(Vec2::new(100_000.0, 0.0), ms(now));
        now += 200;
        session.tick(ms(now));

        let days = session.days();
        assert_eq!(days.len(), (2 + 2 + 1) * CHUNK_SIZE + 1);
        assert_eq!(days.iter().position(|d| *d == today()), Some(CHUNK_SIZE + 2 * CHUNK_SIZE));
        assert!(days.windows(2).all(|pair| pair[1] - pair[0] == chrono::Duration::days(1)));
    }

    #[test]
    fn test_prepend_keeps_visible_content_fixed() {
        let mut session = session();
        session.mount(ms(0));

        session.scroll_by(Vec2::new(-4000.0, 0.0), ms(0));
        let left_before = session.scroll().scroll_left();
        assert!(left_before < LOAD_THRESHOLD);
        let day_before = session.days()[(left_before / DAY_COLUMN_WIDTH) as usize];

        session.tick(ms(150));
        let left_after = session.scroll().scroll_left();
        let day_after = session.days()[(left_after / DAY_COLUMN_WIDTH) as usize];

        assert_eq!(left_after - left_before, CHUNK_SIZE as f32 * DAY_COLUMN_WIDTH);
        assert_eq!(day_before, day_after);
        assert_eq!(session.scroll().header_scroll_left(), left_after);
    }

    #[test]
    fn test_only_one_load_in_flight() {
        let mut session = session();
        session.mount(ms(0));

        session.scroll_by(Vec2::new(-100_000.0, 0.0), ms(0));
        session.tick(ms(150));
        let after_first = session.days().len();

        // Settles again before the lock is released
        session.scroll_by(Vec2::new(-100_000.0, 0.0), ms(160));
        session.tick(ms(320));
        assert_eq!(session.days().len(), after_first);

        // Lock released at 350, the next settle may load again
        session.scroll_by(Vec2::new(50.0, 0.0), ms(400));
        session.tick(ms(560));
        assert_eq!(session.days().len(), after_first + CHUNK_SIZE);
    }

    #[test]
    fn test_drag_suppresses_chunk_loading() {
        let mut session = session();
        session.mount(ms(0));
        let days_before = session.days().len();

        let viewport = session.viewport();
        let press = Pos2::new(viewport.left() + TIME_COLUMN_WIDTH + 40.0, viewport.top() + 40.0);
        session.pointer_down(press, PointerButton::Primary);
        session.pointer_move(press + Vec2::new(0.0, y_for_minutes(60.0)));
        session.pointer_move(press + Vec2::new(0.0, y_for_minutes(120.0)));
        assert!(session.is_dragging());

        session.scroll_by(Vec2::new(-100_000.0, 0.0), ms(0));
        session.tick(ms(200));
        assert_eq!(session.days().len(), days_before);
        assert_ne!(session.scroll().header_scroll_left(), session.scroll().scroll_left());

        assert!(matches!(session.pointer_up(), ReleaseOutcome::Created(_)));
        // The header catches up once the drag ends.
        assert_eq!(session.scroll().header_scroll_left(), session.scroll().scroll_left());
    }

    #[test]
    fn test_indicator_refreshes_every_minute() {
        let first = Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 10, 19, 6, 31, 0).unwrap();
        let mut calls = 0;
        let mut clock = MockClock::new();
        // Construction and mount read the first instant, the refresh the second.
        clock.expect_now().returning(move || {
            calls += 1;
            if calls <= 2 {
                first
            } else {
                later
            }
        });
        let mut session = CalendarSession::new(today(), Box::new(clock), chrono_tz::UTC);
        session.set_viewport(Rect::from_min_size(Pos2::new(0.0, 100.0), Vec2::new(960.0, 600.0)));
        session.mount(ms(0));
        assert_eq!(session.current_time_label(), "06:30");
        assert_eq!(session.indicator_offset(), 6.5 * 80.0);

        session.tick(ms(59_999));
        assert_eq!(session.current_time_label(), "06:30");

        session.tick(INDICATOR_REFRESH);
        assert_eq!(session.current_time_label(), "06:31");
        assert_eq!(session.indicator_offset(), (6.0 + 31.0 / 60.0) * 80.0);
        assert_eq!(session.next_deadline(), Some(2 * INDICATOR_REFRESH));
    }

    #[test]
    fn test_create_save_and_delete_flow() {
        let mut session = session();
        session.mount(ms(0));

        let viewport = session.viewport();
        let press = Pos2::new(viewport.left() + TIME_COLUMN_WIDTH + 40.0, viewport.top() + 40.0);
        session.pointer_down(press, PointerButton::Primary);
        session.pointer_move(press + Vec2::new(0.0, 10.0));
        session.pointer_move(press + Vec2::new(0.0, y_for_minutes(90.0)));
        session.pointer_up();
        assert!(session.active_event().is_some_and(|e| e.is_temporary()));
        assert!(session.event_blocks().iter().any(|b| b.is_temporary && b.is_active));

        let saved = session.save_active("Focus block", "deep work").unwrap();
        assert_eq!(session.events().len(), 1);
        assert_eq!(saved.duration(), chrono::Duration::minutes(90));
        assert!(session.active_event().is_none());

        let block = session.event_blocks().remove(0);
        let center = session.geometry().to_screen(block.rect).center();
        session.pointer_down(center, PointerButton::Primary);
        session.pointer_up();
        session.key(InteractionKey::Delete, PointerTarget::Elsewhere);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_page_buttons_disabled_while_animating() {
        let mut session = session();
        session.mount(ms(0));
        let start = session.scroll().scroll_left();

        assert!(session.page(PageDirection::Left, ms(0)));
        assert!(session.is_animating());
        assert!(!session.page(PageDirection::Left, ms(50)));

        session.tick(ms(300));
        assert_eq!(session.scroll().scroll_left(), start - 4.0 * DAY_COLUMN_WIDTH);
        session.tick(ms(450));
        assert!(!session.is_animating());
    }
}
