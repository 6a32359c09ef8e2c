//! "Now" indicator for the timeline.
//!
//! Wall-clock time is read in a fixed reference timezone and turned into a
//! vertical offset on the hour grid plus an `HH:MM` label.

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::services::geometry::{column_left, DAY_COLUMN_WIDTH, HOUR_ROW_HEIGHT};

/// Source of the current instant.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Horizontal highlight drawn over today's column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TodaySegment {
    pub day_index: usize,
    pub left: f32,
    pub width: f32,
}

pub struct TimelineIndicator {
    clock: Box<dyn Clock>,
    timezone: Tz,
    offset: f32,
    display_time: String,
}

impl TimelineIndicator {
    /// Build the indicator and take the first reading.
    pub fn new(clock: Box<dyn Clock>, timezone: Tz) -> Self {
        let mut indicator = Self {
            clock,
            timezone,
            offset: 0.0,
            display_time: String::new(),
        };
        indicator.refresh();
        indicator
    }

    /// Re-read the clock. Returns the new offset.
    pub fn refresh(&mut self) -> f32 {
        let local = self.clock.now().with_timezone(&self.timezone);
        let (hour, minute) = (local.hour(), local.minute());

        self.offset = (hour as f32 + minute as f32 / 60.0) * HOUR_ROW_HEIGHT;
        self.display_time = format!("{hour:02}:{minute:02}");
        log::trace!("Timeline indicator at {} ({}px)", self.display_time, self.offset);
        self.offset
    }

    /// Calendar date of "now" on this machine, used to find today's column.
    pub fn local_date(&self) -> NaiveDate {
        self.clock.now().with_timezone(&Local).date_naive()
    }

    /// Vertical content offset of "now".
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn display_time(&self) -> &str {
        &self.display_time
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Width of the full line spanning every materialized day.
    pub fn line_width(&self, days: &[NaiveDate]) -> f32 {
        days.len() as f32 * DAY_COLUMN_WIDTH
    }

    /// Highlight over `today`, only when it is materialized.
    pub fn today_segment(&self, days: &[NaiveDate], today: NaiveDate) -> Option<TodaySegment> {
        let day_index = days.iter().position(|day| *day == today)?;
        Some(TodaySegment {
            day_index,
            left: column_left(day_index),
            width: DAY_COLUMN_WIDTH,
        })
    }
}
