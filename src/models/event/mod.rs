// Event module
// Timeline event model shared by the event store and the interaction machine

use chrono::{Duration, NaiveDateTime};
use std::fmt;

/// Prefix carried by identifiers of events that have not been saved yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Identifier of a timeline event.
///
/// Pending events use the [`TEMP_ID_PREFIX`] so cancel paths can tell a
/// discard apart from a delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for an event that is still being created.
    pub fn temporary(seq: u64) -> Self {
        Self(format!("{TEMP_ID_PREFIX}{seq}"))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar event placed on the day x hour grid.
///
/// `start` may be later than `end` while a create-drag is pulling upwards;
/// use [`Event::normalized`] whenever the interval is rendered or measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Event {
    /// Create an untitled event covering `start..end`.
    ///
    /// # Examples
    /// ```
    /// use rust_planner::models::event::{Event, EventId};
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let end = start + chrono::Duration::minutes(45);
    /// let event = Event::new(EventId::new("evt-1"), start, end);
    /// assert_eq!(event.duration(), chrono::Duration::minutes(45));
    /// ```
    pub fn new(id: EventId, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            start,
            end,
        }
    }

    /// The interval as `(min(start, end), max(start, end))`.
    pub fn normalized(&self) -> (NaiveDateTime, NaiveDateTime) {
        if self.end < self.start {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }

    /// Rewrite `start`/`end` so that `start <= end`.
    pub fn normalize(&mut self) {
        let (start, end) = self.normalized();
        self.start = start;
        self.end = end;
    }

    /// Length of the normalized interval.
    pub fn duration(&self) -> Duration {
        let (start, end) = self.normalized();
        end - start
    }

    pub fn is_temporary(&self) -> bool {
        self.id.is_temporary()
    }

    /// True when neither a title nor a description has been entered.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.description.trim().is_empty()
    }
}
