//! habits board/complete-all/reset-all/stats command implementations.

use serde::Serialize;

use crate::cli::context::{
    load_context, load_context_for_write, output_options, push_persist_warning,
};
use crate::cli::view::{card_line, HabitView};
use crate::cli::GlobalOptions;
use crate::error::Result;
use crate::habit::BoardStatus;
use crate::output::{emit_success, HumanOutput};
use crate::stats::Stats;

#[derive(Serialize)]
struct BoardColumn<'a> {
    status: BoardStatus,
    count: usize,
    habits: Vec<HabitView<'a>>,
}

#[derive(Serialize)]
struct BoardOutput<'a> {
    today: String,
    todo: BoardColumn<'a>,
    completed: BoardColumn<'a>,
}

#[derive(Serialize)]
struct BulkMoveOutput {
    moved: usize,
    status: BoardStatus,
}

fn column_title(status: BoardStatus) -> &'static str {
    match status {
        BoardStatus::Todo => "To Do",
        BoardStatus::Completed => "Completed Today",
    }
}

pub fn run_board(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let today = ctx.engine.today();
    let tiers = &ctx.config.display.streak_tiers;

    let column = |status: BoardStatus| {
        let habits: Vec<HabitView<'_>> = ctx
            .engine
            .board(status)
            .into_iter()
            .map(|habit| HabitView::new(habit, today, tiers))
            .collect();
        BoardColumn {
            status,
            count: habits.len(),
            habits,
        }
    };
    let todo = column(BoardStatus::Todo);
    let completed = column(BoardStatus::Completed);

    let mut human = HumanOutput::new(format!("Board for {today}"));
    for col in [&todo, &completed] {
        human.push_detail(format!("{} ({})", column_title(col.status), col.count));
        if col.habits.is_empty() {
            human.push_detail("  (empty)");
        }
        for view in &col.habits {
            human.push_detail(format!("  {}", card_line(view)));
        }
    }
    if todo.count > 0 {
        human.push_next_step("habits done <id>");
    }
    push_persist_warning(&ctx.engine, &mut human);

    let output = BoardOutput {
        today: today.to_string(),
        todo,
        completed,
    };
    emit_success(output_options(&global), "board", &output, Some(&human))
}

pub fn run_complete_all(global: GlobalOptions) -> Result<()> {
    let mut ctx = load_context_for_write(&global)?;
    let moved = ctx.engine.complete_all_todo();

    let mut human = HumanOutput::new(format!("Completed {moved} habit(s) for today"));
    human.push_summary("Completed", ctx.engine.board(BoardStatus::Completed).len().to_string());
    push_persist_warning(&ctx.engine, &mut human);

    let output = BulkMoveOutput {
        moved,
        status: BoardStatus::Completed,
    };
    emit_success(output_options(&global), "complete-all", &output, Some(&human))
}

pub fn run_reset_all(global: GlobalOptions) -> Result<()> {
    let mut ctx = load_context_for_write(&global)?;
    let moved = ctx.engine.move_all_to_todo();

    let mut human = HumanOutput::new(format!("Moved {moved} habit(s) back to todo"));
    human.push_summary("To do", ctx.engine.board(BoardStatus::Todo).len().to_string());
    push_persist_warning(&ctx.engine, &mut human);

    let output = BulkMoveOutput {
        moved,
        status: BoardStatus::Todo,
    };
    emit_success(output_options(&global), "reset-all", &output, Some(&human))
}

pub fn run_stats(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let stats: Stats = ctx.engine.stats();

    let mut human = HumanOutput::new("Progress");
    human.push_summary("Habits", stats.total_habits.to_string());
    human.push_summary(
        "Done today",
        format!(
            "{}/{} ({}%)",
            stats.completed_today, stats.total_habits, stats.completion_rate
        ),
    );
    human.push_summary("Longest streak", stats.longest_streak.to_string());
    human.push_summary("Total completions", stats.total_completions.to_string());
    human.push_summary("To do", stats.todo.to_string());
    human.push_summary("Completed", stats.completed.to_string());
    push_persist_warning(&ctx.engine, &mut human);

    emit_success(output_options(&global), "stats", &stats, Some(&human))
}
