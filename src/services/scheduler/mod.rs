//! Keyed deferred tasks.
//!
//! Every deferred callback of the calendar view (scroll settle, wheel step
//! throttle, indicator refresh, load-lock release) is a deadline stored under
//! its purpose. Arming a key replaces whatever was pending for it.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKey {
    ScrollSettle,
    WheelDebounce,
    IndicatorRefresh,
    LockRelease,
}

/// Deadlines are offsets from the start of the owning session.
#[derive(Debug, Default, Clone)]
pub struct TaskScheduler {
    deadlines: HashMap<TaskKey, Duration>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire `delay` after `now`, cancelling any pending deadline.
    pub fn schedule(&mut self, key: TaskKey, now: Duration, delay: Duration) {
        self.deadlines.insert(key, now + delay);
    }

    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn deadline(&self, key: TaskKey) -> Option<Duration> {
        self.deadlines.get(&key).copied()
    }

    /// Earliest pending deadline, used to schedule the next repaint.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every task due at `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<TaskKey> {
        let mut due: Vec<(Duration, TaskKey)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }
}
