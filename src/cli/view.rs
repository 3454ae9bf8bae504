//! Read-only renderings of habits for human and JSON output.

use serde::Serialize;

use crate::config::StreakTiers;
use crate::day::Day;
use crate::habit::{Habit, StreakTier};

/// A habit plus the figures a card shows next to it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HabitView<'a> {
    #[serde(flatten)]
    pub habit: &'a Habit,
    pub total_completions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<u32>,
    pub streak_tier: StreakTier,
}

impl<'a> HabitView<'a> {
    pub fn new(habit: &'a Habit, today: Day, tiers: &StreakTiers) -> Self {
        Self {
            habit,
            total_completions: habit.total_completions(),
            days_remaining: habit.days_remaining(today),
            streak_tier: StreakTier::classify(habit.streak(), tiers),
        }
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn plural_days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// One-line card: `[id] name - streak, total, days left, done marker`
pub(crate) fn card_line(view: &HabitView<'_>) -> String {
    let habit = view.habit;
    let mut line = format!(
        "[{}] {} - {} {} streak",
        short_id(habit.id()),
        habit.name(),
        habit.streak(),
        plural_days(habit.streak())
    );
    if view.streak_tier != StreakTier::None {
        line.push_str(&format!(" ({})", view.streak_tier.as_str()));
    }
    line.push_str(&format!(", {} total", view.total_completions));
    if let Some(left) = view.days_remaining {
        line.push_str(&format!(", {left} {} left", plural_days(left)));
    }
    if habit.completed_today() {
        line.push_str(", done today");
    }
    line
}
