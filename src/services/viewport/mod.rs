//! Scroll/viewport controller for the continuous timeline.
//!
//! Owns the grid's scroll offsets, mirrors the horizontal offset to the day
//! header, tracks which month is under the viewport center and decides when
//! a chunk of days must be materialized at either edge. A prepend is bridged
//! by a two-phase contract: metrics are recorded before the day range grows
//! and [`ScrollController::after_layout`] compensates once the new width is
//! known, so the content under the viewport does not move.

mod animation;

pub use animation::{ScrollAnimation, SCROLL_ANIMATION};

use chrono::{Datelike, NaiveDate};
use egui::Vec2;
use std::ops::Range;
use std::time::Duration;

use crate::services::date_range::ExtendDirection;
use crate::services::geometry::{column_left, content_width, DAY_COLUMN_WIDTH, GRID_HEIGHT};
use crate::services::scheduler::{TaskKey, TaskScheduler};

/// Distance from either edge that triggers a chunk load.
pub const LOAD_THRESHOLD: f32 = 1000.0;
pub const SCROLL_SETTLE: Duration = Duration::from_millis(150);
pub const LOCK_RELEASE: Duration = Duration::from_millis(200);
pub const WHEEL_STEP_INTERVAL: Duration = Duration::from_millis(100);
/// Columns moved by one scroll button press.
pub const PAGE_DAYS: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageDirection {
    Left,
    Right,
}

impl PageDirection {
    fn sign(self) -> i32 {
        match self {
            PageDirection::Left => -1,
            PageDirection::Right => 1,
        }
    }
}

/// Offsets plus the fields bridging one prepend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub prev_scroll_width: f32,
    pub prev_scroll_left: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Width of the day area (time column excluded)
    pub client_width: f32,
    pub client_height: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
}

#[derive(Debug)]
pub struct ScrollController {
    state: ScrollState,
    metrics: ViewportMetrics,
    header_scroll_left: f32,
    displayed_date: NaiveDate,
    fetching_lock: bool,
    is_loading: bool,
    is_animating: bool,
    pending_load: Option<ExtendDirection>,
    animation: Option<ScrollAnimation>,
}

impl ScrollController {
    pub fn new(displayed_date: NaiveDate, day_count: usize) -> Self {
        Self {
            state: ScrollState::default(),
            metrics: ViewportMetrics {
                scroll_width: content_width(day_count),
                scroll_height: GRID_HEIGHT,
                ..ViewportMetrics::default()
            },
            header_scroll_left: 0.0,
            displayed_date,
            fetching_lock: false,
            is_loading: false,
            is_animating: false,
            pending_load: None,
            animation: None,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    pub fn scroll_left(&self) -> f32 {
        self.state.scroll_left
    }

    pub fn scroll_top(&self) -> f32 {
        self.state.scroll_top
    }

    pub fn header_scroll_left(&self) -> f32 {
        self.header_scroll_left
    }

    /// Date whose month/year the label shows.
    pub fn displayed_date(&self) -> NaiveDate {
        self.displayed_date
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_locked(&self) -> bool {
        self.fetching_lock
    }

    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    /// Record the client area of the viewport; scroll sizes follow the content.
    pub fn set_client_size(&mut self, client_width: f32, client_height: f32) {
        self.metrics.client_width = client_width.max(0.0);
        self.metrics.client_height = client_height.max(0.0);
        self.clamp_offsets();
    }

    fn max_scroll_left(&self) -> f32 {
        (self.metrics.scroll_width - self.metrics.client_width).max(0.0)
    }

    fn max_scroll_top(&self) -> f32 {
        (self.metrics.scroll_height - self.metrics.client_height).max(0.0)
    }

    fn clamp_offsets(&mut self) {
        self.state.scroll_left = self.state.scroll_left.clamp(0.0, self.max_scroll_left());
        self.state.scroll_top = self.state.scroll_top.clamp(0.0, self.max_scroll_top());
    }

    fn clamp_target(&self, target: Vec2) -> Vec2 {
        Vec2::new(
            target.x.clamp(0.0, self.max_scroll_left()),
            target.y.clamp(0.0, self.max_scroll_top()),
        )
    }

    /// Set offsets directly. Returns whether anything moved.
    pub fn scroll_to(&mut self, left: f32, top: f32) -> bool {
        let before = (self.state.scroll_left, self.state.scroll_top);
        self.state.scroll_left = left;
        self.state.scroll_top = top;
        self.clamp_offsets();
        before != (self.state.scroll_left, self.state.scroll_top)
    }

    /// Move by a delta, e.g. from a trackpad. Cancels any running animation.
    pub fn scroll_by(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.animation = None;
        self.scroll_to(self.state.scroll_left + delta.x, self.state.scroll_top + delta.y)
    }

    /// Columns intersecting the viewport, clipped to the materialized range.
    pub fn visible_columns(&self, day_count: usize) -> Range<usize> {
        let first = (self.state.scroll_left / DAY_COLUMN_WIDTH).floor().max(0.0) as usize;
        let last = ((self.state.scroll_left + self.metrics.client_width) / DAY_COLUMN_WIDTH).ceil() as usize;
        first.min(day_count)..last.min(day_count)
    }

    /// Column under the horizontal center of the viewport.
    pub fn center_day_index(&self) -> usize {
        ((self.state.scroll_left + self.metrics.client_width / 2.0) / DAY_COLUMN_WIDTH).floor() as usize
    }

    /// Scroll event handler.
    ///
    /// Mirrors the header offset, updates the displayed month and re-arms the
    /// settle debounce. While `drag_active` the header stays where it is.
    /// Returns the new displayed date when the month/year changed.
    pub fn on_scroll(
        &mut self,
        days: &[NaiveDate],
        now: Duration,
        scheduler: &mut TaskScheduler,
        drag_active: bool,
    ) -> Option<NaiveDate> {
        if !drag_active {
            self.header_scroll_left = self.state.scroll_left;
        }

        let mut changed = None;
        if let Some(center) = days.get(self.center_day_index()).copied() {
            if center.month() != self.displayed_date.month()
                || center.year() != self.displayed_date.year()
            {
                self.displayed_date = center;
                changed = Some(center);
            }
        }

        scheduler.schedule(TaskKey::ScrollSettle, now, SCROLL_SETTLE);
        changed
    }

    /// Scroll-settle callback. Decides whether a chunk must be loaded.
    ///
    /// On `Some`, the caller must grow the day range in that direction and
    /// then report the new width through [`ScrollController::after_layout`].
    pub fn on_settle(&mut self, drag_active: bool) -> Option<ExtendDirection> {
        self.is_animating = false;
        if drag_active || self.is_loading || self.fetching_lock {
            return None;
        }

        let ScrollState { scroll_left, .. } = self.state;
        let ViewportMetrics {
            scroll_width,
            client_width,
            ..
        } = self.metrics;

        let direction = if scroll_width - scroll_left - client_width < LOAD_THRESHOLD {
            self.state.prev_scroll_left = 0.0;
            ExtendDirection::Append
        } else if scroll_left < LOAD_THRESHOLD {
            self.state.prev_scroll_width = scroll_width;
            self.state.prev_scroll_left = scroll_left;
            ExtendDirection::Prepend
        } else {
            return None;
        };

        self.fetching_lock = true;
        self.is_loading = true;
        self.pending_load = Some(direction);
        log::debug!(
            "Loading {:?} chunk at scroll_left={} of {}",
            direction,
            scroll_left,
            scroll_width
        );
        Some(direction)
    }

    /// Post-layout step of a chunk load: adopt the new content width and keep
    /// the visible content fixed after a prepend. The load lock is released
    /// `LOCK_RELEASE` later.
    pub fn after_layout(&mut self, day_count: usize, now: Duration, scheduler: &mut TaskScheduler) {
        if !self.is_loading {
            return;
        }

        let new_scroll_width = content_width(day_count);
        self.metrics.scroll_width = new_scroll_width;

        // Also applied from offset 0: without it the new chunk's first day
        // would replace the column that was at the left edge.
        if self.pending_load == Some(ExtendDirection::Prepend) {
            let scroll_diff = new_scroll_width - self.state.prev_scroll_width;
            if scroll_diff > 0.0 {
                self.state.scroll_left = self.state.prev_scroll_left + scroll_diff;
                self.header_scroll_left = self.state.scroll_left;
                if let Some(animation) = self.animation.as_mut() {
                    animation.shift_x(scroll_diff);
                }
            }
        }
        self.clamp_offsets();

        self.state.prev_scroll_width = 0.0;
        self.pending_load = None;
        self.is_loading = false;
        scheduler.schedule(TaskKey::LockRelease, now, LOCK_RELEASE);
    }

    /// Catch the header up with the grid after a drag paused mirroring.
    pub fn sync_header(&mut self) {
        self.header_scroll_left = self.state.scroll_left;
    }

    /// Lock-release callback.
    pub fn release_lock(&mut self) {
        self.fetching_lock = false;
    }

    fn animate_to(&mut self, target: Vec2, now: Duration) {
        let from = Vec2::new(self.state.scroll_left, self.state.scroll_top);
        let to = self.clamp_target(target);
        self.animation = Some(ScrollAnimation::new(from, to, now));
    }

    /// Scroll-button press: move `PAGE_DAYS` whole columns. Ignored while a
    /// previous press is still animating.
    pub fn page(&mut self, direction: PageDirection, now: Duration) -> bool {
        if self.is_animating {
            return false;
        }

        let target_column =
            (self.state.scroll_left / DAY_COLUMN_WIDTH).round() as i32 + direction.sign() * PAGE_DAYS;
        let target = Vec2::new(target_column as f32 * DAY_COLUMN_WIDTH, self.state.scroll_top);
        // Nothing would scroll, so no settle would ever clear the flag.
        if self.clamp_target(target).x == self.state.scroll_left {
            return false;
        }
        self.is_animating = true;
        self.animate_to(target, now);
        true
    }

    /// Wheel tick. Shift+wheel steps one column, at most once per
    /// `WHEEL_STEP_INTERVAL`. Returns whether the tick was consumed.
    pub fn on_wheel(
        &mut self,
        delta_y: f32,
        shift: bool,
        now: Duration,
        scheduler: &mut TaskScheduler,
    ) -> bool {
        if !shift || delta_y == 0.0 {
            return false;
        }
        if scheduler.is_pending(TaskKey::WheelDebounce) {
            return true;
        }
        scheduler.schedule(TaskKey::WheelDebounce, now, WHEEL_STEP_INTERVAL);

        let step = if delta_y > 0.0 { 1 } else { -1 };
        let target_column = (self.state.scroll_left / DAY_COLUMN_WIDTH).round() as i32 + step;
        let target = Vec2::new(target_column as f32 * DAY_COLUMN_WIDTH, self.state.scroll_top);
        self.animate_to(target, now);
        true
    }

    fn today_target(&self, today_index: usize, indicator_offset: f32) -> Vec2 {
        Vec2::new(
            column_left(today_index) - DAY_COLUMN_WIDTH,
            (indicator_offset - self.metrics.client_height / 2.0).max(0.0),
        )
    }

    /// Immediate recentering used on mount.
    pub fn center_on(&mut self, today_index: usize, indicator_offset: f32) {
        self.animation = None;
        let target = self.today_target(today_index, indicator_offset);
        self.scroll_to(target.x, target.y);
    }

    /// "Jump to today": animate so today's column starts one column from the
    /// left edge and the indicator sits mid-height.
    pub fn jump_to(&mut self, today_index: usize, indicator_offset: f32, now: Duration) {
        let target = self.today_target(today_index, indicator_offset);
        self.animate_to(target, now);
    }

    /// Advance the running animation. Returns whether the offsets moved.
    pub fn tick_animation(&mut self, now: Duration) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (position, finished) = animation.sample(now);
        if finished {
            self.animation = None;
        }
        self.scroll_to(position.x, position.y)
    }
}
