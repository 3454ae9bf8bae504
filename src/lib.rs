//! habits - Daily Habit Tracker Library
//!
//! This library provides the core functionality for the habits CLI tool:
//! a collection of daily habits with per-day completion history, streaks,
//! and a two-column todo/completed board.
//!
//! # Core Concepts
//!
//! - **Habits**: Named records with a color, an optional plan, and a set of completed days
//! - **Streaks**: Consecutive completed days counted back from today
//! - **Board**: Todo and completed columns that follow today's completion
//! - **Store**: The whole collection saved under one key after every change
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `habits.toml`
//! - `day`: Calendar days and the clock that supplies today
//! - `engine`: The habit collection and every operation on it
//! - `error`: Error types and result aliases
//! - `habit`: Habit record and the completion state machine
//! - `lock`: File locking and atomic writes
//! - `stats`: Summary figures over the collection
//! - `storage`: Key-value habit stores (file and in-memory)

pub mod cli;
pub mod config;
pub mod day;
pub mod engine;
pub mod error;
pub mod habit;
pub mod lock;
pub mod output;
pub mod stats;
pub mod storage;

pub use error::{Error, Result};
