//! The habit engine: owner of the habit collection.
//!
//! Every command mutates the in-memory collection first and then writes the
//! whole collection to the store before returning. Store failures are logged
//! and remembered but never undo the in-memory change; the next successful
//! save catches the store up.
//!
//! A store that could not be read (lock timeout, I/O error) is never written:
//! the collection it holds is unknown, and saving would replace it. Only a
//! store whose contents failed to parse is overwritten by later saves.
//!
//! Unknown habit ids are not errors here. A caller holding a stale id gets
//! `None`/`0` back and nothing is written.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::day::{Clock, Day, SystemClock};
use crate::error::{Error, Result};
use crate::habit::{BoardStatus, Completion, Habit, NewHabit};
use crate::stats::Stats;
use crate::storage::HabitStore;

/// Knobs the engine takes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_target_days: u32,
    pub recompute_streak_on_load: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_target_days: 365,
            recompute_streak_on_load: false,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_target_days: config.habits.max_target_days,
            recompute_streak_on_load: config.engine.recompute_streak_on_load,
        }
    }
}

pub struct HabitEngine<S: HabitStore, C: Clock = SystemClock> {
    habits: Vec<Habit>,
    store: S,
    clock: C,
    options: EngineOptions,
    load_error: Option<String>,
    read_only: bool,
    last_persist_error: Option<String>,
}

impl<S: HabitStore, C: Clock> HabitEngine<S, C> {
    /// Load the stored collection and reconcile it with today.
    ///
    /// A missing collection starts empty. A collection that cannot be read
    /// or parsed also starts empty; the failure is logged and available via
    /// [`HabitEngine::load_error`]. An unreadable store leaves the engine
    /// read-only.
    pub fn load(store: S, clock: C, options: EngineOptions) -> Self {
        let today = clock.today();
        let mut load_error = None;
        let mut read_only = false;

        let habits = match store.load() {
            Ok(Some(loaded)) => reconcile_loaded(loaded, today, options.recompute_streak_on_load),
            Ok(None) => {
                debug!("no stored habits, starting empty");
                Vec::new()
            }
            Err(Error::Json(err)) => {
                warn!(error = %err, "stored habits are corrupt, starting empty");
                load_error = Some(format!("stored habits are corrupt and will be replaced: {err}"));
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "failed to read habits, store is read-only");
                load_error = Some(format!("stored habits could not be read: {err}"));
                read_only = true;
                Vec::new()
            }
        };

        info!(count = habits.len(), %today, read_only, "habits loaded");

        Self {
            habits,
            store,
            clock,
            options,
            load_error,
            read_only,
            last_persist_error: None,
        }
    }

    /// Ordered, read-only view of the collection
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn today(&self) -> Day {
        self.clock.today()
    }

    pub fn find(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    /// Find a habit by full id or unique id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Habit> {
        let wanted = id_or_prefix.trim();
        if wanted.is_empty() {
            return Err(Error::InvalidArgument("habit id cannot be empty".to_string()));
        }
        if let Some(habit) = self.find(wanted) {
            return Ok(habit);
        }

        let mut matches = self.habits.iter().filter(|habit| habit.id.starts_with(wanted));
        match (matches.next(), matches.next()) {
            (Some(habit), None) => Ok(habit),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
                "habit id prefix '{wanted}' is ambiguous"
            ))),
            (None, _) => Err(Error::HabitNotFound(wanted.to_string())),
        }
    }

    /// Habits in one board column, in collection order
    pub fn board(&self, status: BoardStatus) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|habit| habit.status == status)
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(&self.habits)
    }

    /// Why the stored collection was not loaded, if it was not. Kept for the
    /// engine's lifetime; saves do not clear it.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// True when the store could not be read. Mutations still apply in
    /// memory but are never saved.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Error from the most recent failed save, cleared by the next
    /// successful save
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a habit and append it to the collection.
    pub fn add_habit(&mut self, input: NewHabit) -> Result<&Habit> {
        input.validate(self.options.max_target_days)?;

        let habit = input.into_habit();
        debug!(id = %habit.id, name = %habit.name, "habit added");
        self.habits.push(habit);
        self.persist();

        let last = self.habits.len() - 1;
        Ok(&self.habits[last])
    }

    /// Flip today's completion for a habit.
    pub fn toggle_habit_complete(&mut self, id: &str) -> Option<&Habit> {
        let idx = self.position(id)?;
        let today = self.today();
        let completion = self.habits[idx].toggle_input(today);
        self.transition(idx, completion, today);
        Some(&self.habits[idx])
    }

    /// Put a habit in a board column; the column decides today's completion.
    pub fn move_habit(&mut self, id: &str, status: BoardStatus) -> Option<&Habit> {
        let idx = self.position(id)?;
        let today = self.today();
        self.transition(idx, status.completion(), today);
        Some(&self.habits[idx])
    }

    /// Remove a habit permanently.
    pub fn delete_habit(&mut self, id: &str) -> Option<Habit> {
        let idx = self.position(id)?;
        let removed = self.habits.remove(idx);
        debug!(id = %removed.id, "habit deleted");
        self.persist();
        Some(removed)
    }

    /// Move every todo habit to completed. Returns how many moved.
    pub fn complete_all_todo(&mut self) -> usize {
        self.move_column(BoardStatus::Todo, BoardStatus::Completed)
    }

    /// Move every completed habit back to todo. Returns how many moved.
    pub fn move_all_to_todo(&mut self) -> usize {
        self.move_column(BoardStatus::Completed, BoardStatus::Todo)
    }

    fn move_column(&mut self, from: BoardStatus, to: BoardStatus) -> usize {
        let today = self.today();
        let completion = to.completion();
        let mut moved = 0;
        for habit in self.habits.iter_mut().filter(|habit| habit.status == from) {
            habit.apply(completion, today);
            moved += 1;
        }

        if moved > 0 {
            debug!(%from, %to, moved, "board column moved");
            self.persist();
        }
        moved
    }

    fn position(&self, id: &str) -> Option<usize> {
        let idx = self.habits.iter().position(|habit| habit.id == id);
        if idx.is_none() {
            debug!(id, "ignoring command for unknown habit");
        }
        idx
    }

    fn transition(&mut self, idx: usize, completion: Completion, today: Day) {
        let habit = &mut self.habits[idx];
        habit.apply(completion, today);
        debug!(
            id = %habit.id,
            ?completion,
            streak = habit.streak,
            status = %habit.status,
            "habit transitioned"
        );
        self.persist();
    }

    fn persist(&mut self) {
        if self.read_only {
            warn!("store was not readable at load, not saving");
            self.last_persist_error =
                Some("not saved: stored habits could not be read at load".to_string());
            return;
        }
        match self.store.save(&self.habits) {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                warn!(error = %err, "failed to save habits, keeping in-memory state");
                self.last_persist_error = Some(err.to_string());
            }
        }
    }
}

fn reconcile_loaded(loaded: Vec<Habit>, today: Day, recompute_streak: bool) -> Vec<Habit> {
    let mut seen = HashSet::new();
    let mut habits = Vec::with_capacity(loaded.len());
    for mut habit in loaded {
        if !seen.insert(habit.id.clone()) {
            warn!(id = %habit.id, "dropping stored habit with duplicate id");
            continue;
        }
        habit.reconcile(today, recompute_streak);
        habits.push(habit);
    }
    habits
}
