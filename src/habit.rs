//! The habit record and its completion state machine.
//!
//! A habit carries a set of completion days plus a few fields derived from
//! that set (`streak`, `completed_today`) and a board column (`status`).
//! Derived fields are only ever written by [`Habit::apply`], which is the
//! single transition function behind both the completion toggle and board
//! moves.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StreakTiers;
use crate::day::Day;
use crate::error::{Error, Result};

/// Board column a habit is displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    #[default]
    Todo,
    Completed,
}

impl BoardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardStatus::Todo => "todo",
            BoardStatus::Completed => "completed",
        }
    }

    /// The completion input a move into this column stands for.
    pub fn completion(&self) -> Completion {
        match self {
            BoardStatus::Todo => Completion::Uncomplete,
            BoardStatus::Completed => Completion::Complete,
        }
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(BoardStatus::Todo),
            "completed" | "done" => Ok(BoardStatus::Completed),
            other => Err(Error::InvalidArgument(format!(
                "invalid status '{other}' (expected todo|completed)"
            ))),
        }
    }
}

/// Canonical input to the completion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    Uncomplete,
}

/// Length of the unbroken run of completed days ending at `today`.
///
/// Walks backward from `today` one calendar day at a time and stops at the
/// first day missing from `days`. Days after `today` are ignored.
pub fn streak(days: &BTreeSet<Day>, today: Day) -> u32 {
    let mut count = 0;
    let mut cursor = today;
    while days.contains(&cursor) {
        count += 1;
        let prev = cursor.pred();
        if prev == cursor {
            break;
        }
        cursor = prev;
    }
    count
}

/// Display classification of a streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    None,
    Building,
    Strong,
    Legendary,
}

impl StreakTier {
    pub fn classify(streak: u32, tiers: &StreakTiers) -> Self {
        if streak >= tiers.legendary {
            StreakTier::Legendary
        } else if streak >= tiers.strong {
            StreakTier::Strong
        } else if streak >= tiers.building {
            StreakTier::Building
        } else {
            StreakTier::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreakTier::None => "none",
            StreakTier::Building => "building",
            StreakTier::Strong => "strong",
            StreakTier::Legendary => "legendary",
        }
    }
}

/// One tracked daily habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) color: String,
    #[serde(default)]
    pub(crate) streak: u32,
    #[serde(default)]
    pub(crate) completed_today: bool,
    #[serde(default)]
    pub(crate) completed_dates: BTreeSet<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_completed_date: Option<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) target_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) start_date: Option<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) end_date: Option<Day>,
    #[serde(default)]
    pub(crate) status: BoardStatus,
}

impl Habit {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn completed_today(&self) -> bool {
        self.completed_today
    }

    pub fn completed_dates(&self) -> &BTreeSet<Day> {
        &self.completed_dates
    }

    pub fn last_completed_date(&self) -> Option<Day> {
        self.last_completed_date
    }

    pub fn target_days(&self) -> Option<u32> {
        self.target_days
    }

    pub fn start_date(&self) -> Option<Day> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<Day> {
        self.end_date
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    /// Lifetime number of completed days.
    pub fn total_completions(&self) -> usize {
        self.completed_dates.len()
    }

    pub fn is_completed_on(&self, day: Day) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Days left of the planned run, if both a target and a start are set.
    ///
    /// Never negative. Before the start date it exceeds the target.
    pub fn days_remaining(&self, today: Day) -> Option<u32> {
        let target = i64::from(self.target_days?);
        let elapsed = today.days_since(self.start_date?);
        Some(u32::try_from((target - elapsed).max(0)).unwrap_or(u32::MAX))
    }

    /// Apply one completion input for `today` and recompute derived fields.
    ///
    /// Completing adds `today` to the day set and records it as the last
    /// completion; uncompleting removes it and leaves `last_completed_date`
    /// alone. Either way the board column follows the completion state.
    pub fn apply(&mut self, completion: Completion, today: Day) {
        match completion {
            Completion::Complete => {
                self.completed_dates.insert(today);
                self.last_completed_date = Some(today);
                self.status = BoardStatus::Completed;
            }
            Completion::Uncomplete => {
                self.completed_dates.remove(&today);
                self.status = BoardStatus::Todo;
            }
        }
        self.refresh(today);
    }

    /// The input a completion toggle stands for on `today`.
    pub fn toggle_input(&self, today: Day) -> Completion {
        if self.is_completed_on(today) {
            Completion::Uncomplete
        } else {
            Completion::Complete
        }
    }

    /// Recompute `streak` and `completed_today` from the day set.
    pub(crate) fn refresh(&mut self, today: Day) {
        self.streak = streak(&self.completed_dates, today);
        self.completed_today = self.completed_dates.contains(&today);
    }

    /// Bring a freshly loaded habit in line with `today`.
    ///
    /// A habit last saved on an earlier day no longer counts as completed
    /// today and drops back to the todo column. The persisted streak is kept
    /// unless `recompute_streak` is set.
    pub(crate) fn reconcile(&mut self, today: Day, recompute_streak: bool) {
        self.completed_today = self.completed_dates.contains(&today);
        if !self.completed_today {
            self.status = BoardStatus::Todo;
        }
        if recompute_streak {
            self.streak = streak(&self.completed_dates, today);
        }
    }
}

/// Input for creating a habit, as collected by a creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub target_days: Option<u32>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    /// Check the input before anything is created.
    pub fn validate(&self, max_target_days: u32) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidHabit("name cannot be empty".to_string()));
        }

        if let Some(target) = self.target_days {
            if target == 0 || target > max_target_days {
                return Err(Error::InvalidHabit(format!(
                    "target days must be between 1 and {max_target_days}, got {target}"
                )));
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::InvalidHabit(format!(
                    "end date {end} is before start date {start}"
                )));
            }
        }

        Ok(())
    }

    /// Build the habit record with a fresh id and an empty history.
    pub(crate) fn into_habit(self) -> Habit {
        let description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Habit {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description,
            color: self.color.trim().to_string(),
            streak: 0,
            completed_today: false,
            completed_dates: BTreeSet::new(),
            last_completed_date: None,
            target_days: self.target_days,
            start_date: self.start_date,
            end_date: self.end_date,
            status: BoardStatus::Todo,
        }
    }
}
