//! Shared setup for CLI commands: data directory, config, store and engine.

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::day::{Clock, Day, FixedClock, SystemClock};
use crate::engine::{EngineOptions, HabitEngine};
use crate::error::{Error, Result};
use crate::output::{HumanOutput, OutputOptions};
use crate::storage::{self, FileStore};

pub(crate) type CliEngine = HabitEngine<FileStore, FixedClock>;

pub(crate) struct Context {
    pub engine: CliEngine,
    pub config: Config,
}

/// Resolve the data directory, read config and load the engine.
///
/// Today is pinned once per invocation, from `--today` when given.
pub(crate) fn load_context(global: &GlobalOptions) -> Result<Context> {
    let data_dir = match &global.data_dir {
        Some(dir) => dir.clone(),
        None => storage::default_data_dir()?,
    };
    let config = Config::load_from_dir(&data_dir)?;
    let today = resolve_today(global.today.as_deref())?;

    tracing::debug!(data_dir = %data_dir.display(), %today, "loading habits");

    let store = FileStore::from_config(&data_dir, &config.storage);
    let engine = HabitEngine::load(store, FixedClock(today), EngineOptions::from_config(&config));

    Ok(Context { engine, config })
}

/// Like [`load_context`], for commands that change habits.
///
/// Fails when the store could not be read, so the command never replaces
/// habits it has not seen.
pub(crate) fn load_context_for_write(global: &GlobalOptions) -> Result<Context> {
    let ctx = load_context(global)?;
    if ctx.engine.is_read_only() {
        let reason = ctx.engine.load_error().unwrap_or("store not readable");
        return Err(Error::OperationFailed(format!(
            "refusing to change habits: {reason}"
        )));
    }
    Ok(ctx)
}

pub(crate) fn resolve_today(raw: Option<&str>) -> Result<Day> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Day::parse(value),
        None => Ok(SystemClock.today()),
    }
}

pub(crate) fn output_options(global: &GlobalOptions) -> OutputOptions {
    OutputOptions {
        json: global.json,
        quiet: global.quiet,
    }
}

/// Surface a failed load or save as a warning on the command output.
pub(crate) fn push_persist_warning(engine: &CliEngine, human: &mut HumanOutput) {
    if let Some(err) = engine.load_error() {
        human.push_warning(err);
    }
    if let Some(err) = engine.last_persist_error() {
        human.push_warning(format!("habit data not saved: {err}"));
    }
}
