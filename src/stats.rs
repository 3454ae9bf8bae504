use serde::Serialize;

use crate::habit::{BoardStatus, Habit};

/// Summary figures over the habit collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_habits: usize,
    pub completed_today: usize,
    /// Percent of habits completed today, rounded
    pub completion_rate: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
    pub todo: usize,
    pub completed: usize,
}

impl Stats {
    pub fn compute(habits: &[Habit]) -> Self {
        let total_habits = habits.len();
        let completed_today = habits.iter().filter(|h| h.completed_today()).count();
        let completion_rate = if total_habits == 0 {
            0
        } else {
            ((completed_today as f64 / total_habits as f64) * 100.0).round() as u32
        };

        Self {
            total_habits,
            completed_today,
            completion_rate,
            longest_streak: habits.iter().map(Habit::streak).max().unwrap_or(0),
            total_completions: habits.iter().map(Habit::total_completions).sum(),
            todo: habits
                .iter()
                .filter(|h| h.status() == BoardStatus::Todo)
                .count(),
            completed: habits
                .iter()
                .filter(|h| h.status() == BoardStatus::Completed)
                .count(),
        }
    }
}
