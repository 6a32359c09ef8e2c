// Todo and habit models
// Plain records used by the coin rewards bookkeeping

use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    /// Coins granted when the todo is completed
    pub points: f64,
    pub is_completed: bool,
}

impl Todo {
    pub fn new(id: u64, text: impl Into<String>, points: f64) -> Self {
        Self {
            id,
            text: text.into(),
            points,
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    pub id: u64,
    pub text: String,
    pub icon: String,
    /// Coins granted per completion
    pub coins: f64,
    pub penalty: f64,
    /// Completions per day
    pub goal: u32,
    pub category: String,
    pub progress: BTreeMap<NaiveDate, u32>,
}

impl Habit {
    pub fn progress_on(&self, date: NaiveDate) -> u32 {
        self.progress.get(&date).copied().unwrap_or(0)
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.progress_on(date) >= self.goal
    }
}
