//! Materialized day range backing the continuous timeline.
//!
//! The range only ever grows, one chunk at a time, at either end. Days are
//! kept strictly ascending and contiguous.

use chrono::{Duration, NaiveDate};

/// Number of days added by one extension.
pub const CHUNK_SIZE: usize = 30;

/// Which end of the range an extension grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendDirection {
    Prepend,
    Append,
}

/// Generate `CHUNK_SIZE` contiguous days adjacent to `base`, in ascending order.
///
/// `Prepend` yields the days immediately before `base`, `Append` the days
/// immediately after it.
pub fn generate_chunk(base: NaiveDate, direction: ExtendDirection) -> Vec<NaiveDate> {
    let offsets: Vec<i64> = match direction {
        ExtendDirection::Prepend => (1..=CHUNK_SIZE as i64).rev().map(|i| -i).collect(),
        ExtendDirection::Append => (1..=CHUNK_SIZE as i64).collect(),
    };

    offsets
        .into_iter()
        .map(|offset| base + Duration::days(offset))
        .collect()
}

#[derive(Debug, Clone)]
pub struct DateRangeStore {
    days: Vec<NaiveDate>,
}

impl DateRangeStore {
    /// Range of `today - CHUNK_SIZE ..= today + CHUNK_SIZE`.
    pub fn centered_on(today: NaiveDate) -> Self {
        let span = CHUNK_SIZE as i64;
        let days = (-span..=span)
            .map(|offset| today + Duration::days(offset))
            .collect();
        Self { days }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// Column index of `date`, if it is materialized.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.first()?;
        let offset = (date - first).num_days();
        if offset < 0 || offset as usize >= self.days.len() {
            return None;
        }
        Some(offset as usize)
    }

    /// Grow the range by one chunk and return the new days.
    pub fn extend(&mut self, direction: ExtendDirection) -> Vec<NaiveDate> {
        let base = match direction {
            ExtendDirection::Prepend => self.first(),
            ExtendDirection::Append => self.last(),
        };
        let Some(base) = base else {
            return Vec::new();
        };

        let chunk = generate_chunk(base, direction);
        let days = match direction {
            ExtendDirection::Prepend => {
                let mut days = chunk.clone();
                days.extend_from_slice(&self.days);
                days
            }
            ExtendDirection::Append => {
                let mut days = self.days.clone();
                days.extend_from_slice(&chunk);
                days
            }
        };
        self.days = days;

        log::debug!(
            "Extended day range ({:?}): {} days, {:?}..={:?}",
            direction,
            self.days.len(),
            self.first(),
            self.last()
        );
        chunk
    }
}
