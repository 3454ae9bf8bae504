//! Command-line interface for habits
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod board;
mod context;
mod habit;
mod view;

/// habits - daily habit tracker
///
/// Track daily habits, keep streaks going, and move habits between a todo
/// and a completed column.
#[derive(Parser, Debug)]
#[command(name = "habits")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding habits.toml and the habit data
    #[arg(long, global = true, env = "HABITS_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "HABITS_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        /// Optional notes about the habit
        #[arg(short, long)]
        description: Option<String>,

        /// Accent color: palette name or hex value (see `habits palette`)
        #[arg(short, long)]
        color: Option<String>,

        /// Planned run length in days (1-365)
        #[arg(long)]
        target_days: Option<u32>,

        /// First day of the planned run (defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// Last day of the planned run
        #[arg(long)]
        end: Option<String>,
    },

    /// List habits
    List {
        /// Only show one board column: todo or completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one habit with its completion history
    Show {
        /// Habit id or unique id prefix
        id: String,
    },

    /// Toggle today's completion for a habit
    Done {
        /// Habit id or unique id prefix
        id: String,
    },

    /// Move a habit to a board column
    Move {
        /// Habit id or unique id prefix
        id: String,

        /// Target column: todo or completed
        status: String,
    },

    /// Delete a habit permanently
    Rm {
        /// Habit id or unique id prefix
        id: String,
    },

    /// Show the todo and completed columns
    Board,

    /// Mark every todo habit as completed today
    CompleteAll,

    /// Move every completed habit back to todo
    ResetAll,

    /// Show progress statistics
    Stats,

    /// List the accepted accent colors
    Palette,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            data_dir: self.data_dir,
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                name,
                description,
                color,
                target_days,
                start,
                end,
            } => habit::run_add(habit::AddOptions {
                name,
                description,
                color,
                target_days,
                start,
                end,
                global,
            }),
            Commands::List { status } => habit::run_list(habit::ListOptions { status, global }),
            Commands::Show { id } => habit::run_show(habit::IdOptions { id, global }),
            Commands::Done { id } => habit::run_done(habit::IdOptions { id, global }),
            Commands::Move { id, status } => {
                habit::run_move(habit::MoveOptions { id, status, global })
            }
            Commands::Rm { id } => habit::run_rm(habit::IdOptions { id, global }),
            Commands::Board => board::run_board(global),
            Commands::CompleteAll => board::run_complete_all(global),
            Commands::ResetAll => board::run_reset_all(global),
            Commands::Stats => board::run_stats(global),
            Commands::Palette => habit::run_palette(global),
        }
    }
}
