//! Grid geometry shared by the scroll controller, the interaction state
//! machine and the renderer.
//!
//! Content coordinates put day column `i` at `[i * DAY_COLUMN_WIDTH, (i + 1) * DAY_COLUMN_WIDTH)`
//! and hour `h` at `[h * HOUR_ROW_HEIGHT, (h + 1) * HOUR_ROW_HEIGHT)`. The time
//! column sits left of the viewport's day area and never scrolls horizontally.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use egui::{Pos2, Rect, Vec2};

use crate::models::event::{Event, EventId};

pub const DAY_COLUMN_WIDTH: f32 = 150.0;
pub const HOUR_ROW_HEIGHT: f32 = 80.0;
pub const TIME_COLUMN_WIDTH: f32 = 60.0;
pub const SNAP_MINUTES: i64 = 15;
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Total height of the 24-hour grid.
pub const GRID_HEIGHT: f32 = 24.0 * HOUR_ROW_HEIGHT;

/// Floor `minutes` to the previous 15-minute boundary within one day.
pub fn snap_minutes(minutes: f32) -> i64 {
    let slot = (minutes / SNAP_MINUTES as f32).floor() as i64;
    (slot * SNAP_MINUTES).clamp(0, MINUTES_PER_DAY - SNAP_MINUTES)
}

/// Vertical content offset of `minutes` past midnight.
pub fn y_for_minutes(minutes: f32) -> f32 {
    minutes / 60.0 * HOUR_ROW_HEIGHT
}

pub fn y_for_time(time: NaiveTime) -> f32 {
    y_for_minutes(time.num_seconds_from_midnight() as f32 / 60.0)
}

/// Left content edge of day column `index`.
pub fn column_left(index: usize) -> f32 {
    index as f32 * DAY_COLUMN_WIDTH
}

/// Width of all materialized day columns.
pub fn content_width(day_count: usize) -> f32 {
    day_count as f32 * DAY_COLUMN_WIDTH
}

/// Rectangle of one event on one day, in content coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBlock {
    pub event_id: EventId,
    pub day_index: usize,
    pub rect: Rect,
    /// Drawn with the "creating" style
    pub is_temporary: bool,
    pub is_active: bool,
}

/// Snapshot of the viewport needed to map pointer positions onto the grid.
#[derive(Clone, Copy, Debug)]
pub struct GridGeometry<'a> {
    /// Screen rectangle of the scrollable grid element, time column included
    pub viewport: Rect,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub days: &'a [NaiveDate],
}

impl<'a> GridGeometry<'a> {
    pub fn new(viewport: Rect, scroll_left: f32, scroll_top: f32, days: &'a [NaiveDate]) -> Self {
        Self {
            viewport,
            scroll_left,
            scroll_top,
            days,
        }
    }

    /// Screen position to content coordinates.
    pub fn to_content(&self, pos: Pos2) -> Pos2 {
        Pos2::new(
            pos.x - self.viewport.left() - TIME_COLUMN_WIDTH + self.scroll_left,
            pos.y - self.viewport.top() + self.scroll_top,
        )
    }

    /// Content rectangle to screen coordinates.
    pub fn to_screen(&self, rect: Rect) -> Rect {
        rect.translate(Vec2::new(
            self.viewport.left() + TIME_COLUMN_WIDTH - self.scroll_left,
            self.viewport.top() - self.scroll_top,
        ))
    }

    /// Day column under `pos`, `None` outside the materialized range.
    pub fn column_at(&self, pos: Pos2) -> Option<usize> {
        let x = self.to_content(pos).x;
        if x < 0.0 {
            return None;
        }
        let index = (x / DAY_COLUMN_WIDTH).floor() as usize;
        (index < self.days.len()).then_some(index)
    }

    /// Unsnapped minutes past midnight under `pos`, clamped to the day.
    pub fn minutes_at(&self, pos: Pos2) -> f32 {
        let y = self.to_content(pos).y;
        (y / HOUR_ROW_HEIGHT * 60.0).clamp(0.0, MINUTES_PER_DAY as f32)
    }

    /// Snapped timestamp under `pos`.
    pub fn date_time_at(&self, pos: Pos2) -> Option<NaiveDateTime> {
        let date = self.days.get(self.column_at(pos)?)?;
        let minutes = snap_minutes(self.minutes_at(pos));
        Some(date.and_time(NaiveTime::MIN) + Duration::minutes(minutes))
    }

    fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let first = *self.days.first()?;
        let offset = (date - first).num_days();
        (offset >= 0 && (offset as usize) < self.days.len()).then_some(offset as usize)
    }

    /// Lay out `event` as one block per materialized day it touches.
    pub fn blocks_for(&self, event: &Event, is_active: bool) -> Vec<EventBlock> {
        let (start, end) = event.normalized();
        let mut blocks = Vec::new();
        let mut date = start.date();

        while date <= end.date() {
            let day_start = date.and_time(NaiveTime::MIN);
            let day_end = day_start + Duration::days(1);
            let segment_start = start.max(day_start);
            let segment_end = end.min(day_end);
            let instant_on_day = start == end && date == start.date();

            if segment_start < segment_end || instant_on_day {
                if let Some(index) = self.day_index(date) {
                    let top = y_for_minutes((segment_start - day_start).num_minutes() as f32);
                    let bottom = y_for_minutes((segment_end - day_start).num_minutes() as f32);
                    blocks.push(EventBlock {
                        event_id: event.id.clone(),
                        day_index: index,
                        rect: Rect::from_min_max(
                            Pos2::new(column_left(index), top),
                            Pos2::new(column_left(index) + DAY_COLUMN_WIDTH, bottom),
                        ),
                        is_temporary: event.is_temporary(),
                        is_active,
                    });
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        blocks
    }
}

/// Top-most block containing `pos` (blocks are painted in slice order).
pub fn block_at<'b>(
    blocks: &'b [EventBlock],
    geometry: &GridGeometry<'_>,
    pos: Pos2,
) -> Option<&'b EventBlock> {
    if pos.x < geometry.viewport.left() + TIME_COLUMN_WIDTH || !geometry.viewport.contains(pos) {
        return None;
    }
    let content = geometry.to_content(pos);
    blocks.iter().rev().find(|block| block.rect.contains(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn days() -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
        (0..7).map(|i| first + Duration::days(i)).collect()
    }

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0))
    }

    #[test_case(0.0 => 0; "midnight")]
    #[test_case(554.0 => 540; "09:14 floors to 09:00")]
    #[test_case(555.0 => 555; "09:15 stays")]
    #[test_case(569.9 => 555; "just below next slot")]
    #[test_case(-20.0 => 0; "above grid clamps")]
    #[test_case(1439.0 => 1425; "last slot")]
    fn test_snap_minutes(minutes: f32) -> i64 {
        snap_minutes(minutes)
    }

    #[test]
    fn test_date_time_at_maps_column_and_snaps() {
        let days = days();
        let geometry = GridGeometry::new(viewport(), 150.0, 400.0, &days);

        // Column 2 is at content x 300..450; screen x = 100 + 60 + 300 - 150.
        let pos = Pos2::new(310.0 + 10.0, 50.0 + y_for_minutes(9.0 * 60.0 + 7.0) - 400.0);
        let result = geometry.date_time_at(pos).unwrap();

        assert_eq!(result.date(), days[2]);
        assert_eq!(result.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_positions_outside_range_resolve_to_none() {
        let days = days();
        let geometry = GridGeometry::new(viewport(), 0.0, 0.0, &days);

        // Inside the time column
        assert_eq!(geometry.date_time_at(Pos2::new(120.0, 100.0)), None);
        // Past the last materialized column
        let beyond = 100.0 + TIME_COLUMN_WIDTH + content_width(days.len()) + 5.0;
        assert_eq!(geometry.date_time_at(Pos2::new(beyond, 100.0)), None);
    }

    #[test]
    fn test_blocks_span_midnight() {
        let days = days();
        let geometry = GridGeometry::new(viewport(), 0.0, 0.0, &days);
        let start = days[1].and_hms_opt(22, 0, 0).unwrap();
        let end = days[2].and_hms_opt(1, 30, 0).unwrap();
        let event = Event::new(EventId::new("evt-1"), end, start);

        let blocks = geometry.blocks_for(&event, false);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].day_index, 1);
        assert_eq!(blocks[0].rect.top(), 22.0 * HOUR_ROW_HEIGHT);
        assert_eq!(blocks[0].rect.bottom(), GRID_HEIGHT);
        assert_eq!(blocks[1].day_index, 2);
        assert_eq!(blocks[1].rect.top(), 0.0);
        assert_eq!(blocks[1].rect.bottom(), 1.5 * HOUR_ROW_HEIGHT);
    }

    #[test]
    fn test_zero_length_event_still_has_block() {
        let days = days();
        let geometry = GridGeometry::new(viewport(), 0.0, 0.0, &days);
        let at = days[0].and_hms_opt(9, 0, 0).unwrap();
        let event = Event::new(EventId::temporary(1), at, at);

        let blocks = geometry.blocks_for(&event, true);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_temporary);
        assert_eq!(blocks[0].rect.height(), 0.0);
    }

    #[test]
    fn test_block_at_prefers_last_painted() {
        let days = days();
        let geometry = GridGeometry::new(viewport(), 0.0, 0.0, &days);
        let start = days[0].and_hms_opt(1, 0, 0).unwrap();
        let below = Event::new(EventId::new("evt-1"), start, start + Duration::hours(2));
        let above = Event::new(EventId::new("evt-2"), start, start + Duration::hours(1));

        let mut blocks = geometry.blocks_for(&below, false);
        blocks.extend(geometry.blocks_for(&above, false));

        let pos = Pos2::new(100.0 + TIME_COLUMN_WIDTH + 20.0, 50.0 + HOUR_ROW_HEIGHT + 10.0);
        let hit = block_at(&blocks, &geometry, pos).unwrap();
        assert_eq!(hit.event_id, EventId::new("evt-2"));
    }
}
