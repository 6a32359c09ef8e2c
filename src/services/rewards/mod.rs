//! Coin bookkeeping for todos and habits.

use chrono::NaiveDate;

use crate::models::todo::{Habit, Todo};

pub const STARTING_COINS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CoinLedger {
    total: f64,
}

impl Default for CoinLedger {
    fn default() -> Self {
        Self {
            total: STARTING_COINS,
        }
    }
}

impl CoinLedger {
    pub fn new(total: f64) -> Self {
        Self { total }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Flip completion of todo `id` and move its points in or out of the
    /// total. Returns the signed change, `None` for an unknown id.
    pub fn toggle_todo(&mut self, todos: &mut [Todo], id: u64) -> Option<f64> {
        let todo = todos.iter_mut().find(|todo| todo.id == id)?;
        let change = if todo.is_completed {
            -todo.points
        } else {
            todo.points
        };
        todo.is_completed = !todo.is_completed;
        self.total += change;
        log::debug!("Todo {} toggled, coins {:+}", id, change);
        Some(change)
    }

    /// Record one completion for `date` while below the daily goal.
    /// Returns the coins gained.
    pub fn complete_habit(&mut self, habit: &mut Habit, date: NaiveDate) -> f64 {
        let progress = habit.progress_on(date);
        if progress >= habit.goal {
            return 0.0;
        }
        habit.progress.insert(date, progress + 1);
        self.total += habit.coins;
        habit.coins
    }

    /// Clear `date`'s progress and take back what it earned.
    pub fn reset_habit(&mut self, habit: &mut Habit, date: NaiveDate) -> f64 {
        let progress = habit.progress_on(date);
        if progress == 0 {
            return 0.0;
        }
        habit.progress.insert(date, 0);
        let deducted = habit.coins * progress as f64;
        self.total -= deducted;
        deducted
    }
}
