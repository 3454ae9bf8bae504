//! habits add/list/show/done/move/rm/palette command implementations.

use serde::Serialize;

use crate::cli::context::{
    load_context, load_context_for_write, output_options, push_persist_warning,
};
use crate::cli::view::{card_line, short_id, HabitView};
use crate::cli::GlobalOptions;
use crate::config::{Config, PaletteColor};
use crate::day::Day;
use crate::error::{Error, Result};
use crate::habit::{BoardStatus, NewHabit};
use crate::output::{emit_success, HumanOutput};

pub struct AddOptions {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub target_days: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub status: Option<String>,
    pub global: GlobalOptions,
}

pub struct IdOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct MoveOptions {
    pub id: String,
    pub status: String,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct HabitListOutput<'a> {
    total: usize,
    habits: Vec<HabitView<'a>>,
}

#[derive(Serialize)]
struct HabitShowOutput<'a> {
    habit: HabitView<'a>,
}

#[derive(Serialize)]
struct HabitRemovedOutput {
    id: String,
    name: String,
}

#[derive(Serialize)]
struct PaletteOutput<'a> {
    default: Option<&'a str>,
    colors: &'a [PaletteColor],
}

fn parse_optional_day(raw: Option<&str>) -> Result<Option<Day>> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Day::parse)
        .transpose()
}

fn resolve_color(config: &Config, raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(config.habits.resolve_color(value)?.hex.clone()),
        None => config
            .habits
            .default_color()
            .map(|color| color.hex.clone())
            .ok_or_else(|| Error::InvalidConfig("habits.palette cannot be empty".to_string())),
    }
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context_for_write(&options.global)?;
    let today = ctx.engine.today();

    let color = resolve_color(&ctx.config, options.color.as_deref())?;
    let start_date = parse_optional_day(options.start.as_deref())?.unwrap_or(today);
    let end_date = parse_optional_day(options.end.as_deref())?;
    let target_days = options
        .target_days
        .unwrap_or(ctx.config.habits.default_target_days);

    let input = NewHabit {
        name: options.name,
        description: options.description,
        color,
        target_days: Some(target_days),
        start_date: Some(start_date),
        end_date,
    };

    let tiers = ctx.config.display.streak_tiers.clone();
    let habit = ctx.engine.add_habit(input)?.clone();
    let id = habit.id().to_string();

    let mut human = HumanOutput::new(format!("Habit added: {}", habit.name()));
    human.push_summary("ID", id.clone());
    human.push_summary("Color", habit.color());
    human.push_summary("Target", format!("{target_days} days from {start_date}"));
    if let Some(end) = end_date {
        human.push_summary("Ends", end.to_string());
    }
    human.push_next_step(format!("habits done {}", short_id(&id)));

    let output = HabitShowOutput {
        habit: HabitView::new(&habit, today, &tiers),
    };
    push_persist_warning(&ctx.engine, &mut human);

    emit_success(output_options(&options.global), "add", &output, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let status = options
        .status
        .as_deref()
        .map(str::parse::<BoardStatus>)
        .transpose()?;
    let today = ctx.engine.today();
    let tiers = &ctx.config.display.streak_tiers;

    let habits: Vec<HabitView<'_>> = ctx
        .engine
        .habits()
        .iter()
        .filter(|habit| status.map_or(true, |wanted| habit.status() == wanted))
        .map(|habit| HabitView::new(habit, today, tiers))
        .collect();

    let header = if habits.is_empty() {
        "No habits yet".to_string()
    } else {
        format!("Habits ({})", habits.len())
    };
    let mut human = HumanOutput::new(header);
    for view in &habits {
        human.push_detail(card_line(view));
    }
    if ctx.engine.habits().is_empty() {
        human.push_next_step("habits add \"<name>\"");
    }
    push_persist_warning(&ctx.engine, &mut human);

    let output = HabitListOutput {
        total: habits.len(),
        habits,
    };

    emit_success(output_options(&options.global), "list", &output, Some(&human))
}

pub fn run_show(options: IdOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let today = ctx.engine.today();
    let habit = ctx.engine.resolve(&options.id)?;
    let view = HabitView::new(habit, today, &ctx.config.display.streak_tiers);

    let mut human = HumanOutput::new(habit.name().to_string());
    human.push_summary("ID", habit.id());
    if let Some(description) = habit.description() {
        human.push_summary("Description", description);
    }
    human.push_summary("Color", habit.color());
    human.push_summary("Status", habit.status().as_str());
    human.push_summary(
        "Streak",
        format!("{} ({})", habit.streak(), view.streak_tier.as_str()),
    );
    human.push_summary("Total", view.total_completions.to_string());
    if let Some(last) = habit.last_completed_date() {
        human.push_summary("Last completed", last.to_string());
    }
    if let Some(left) = view.days_remaining {
        human.push_summary("Days left", left.to_string());
    }
    if let Some(end) = habit.end_date() {
        human.push_summary("Ends", end.to_string());
    }
    for day in habit.completed_dates().iter().rev() {
        human.push_detail(day.to_string());
    }
    push_persist_warning(&ctx.engine, &mut human);

    let output = HabitShowOutput { habit: view };
    emit_success(output_options(&options.global), "show", &output, Some(&human))
}

pub fn run_done(options: IdOptions) -> Result<()> {
    let mut ctx = load_context_for_write(&options.global)?;
    let id = ctx.engine.resolve(&options.id)?.id().to_string();
    let today = ctx.engine.today();
    let tiers = ctx.config.display.streak_tiers.clone();

    let habit = ctx
        .engine
        .toggle_habit_complete(&id)
        .cloned()
        .ok_or_else(|| Error::HabitNotFound(id.clone()))?;

    let header = if habit.completed_today() {
        format!("Completed: {}", habit.name())
    } else {
        format!("Not completed: {}", habit.name())
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Streak", habit.streak().to_string());
    human.push_summary("Status", habit.status().as_str());

    let output = HabitShowOutput {
        habit: HabitView::new(&habit, today, &tiers),
    };
    push_persist_warning(&ctx.engine, &mut human);

    emit_success(output_options(&options.global), "done", &output, Some(&human))
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let status: BoardStatus = options.status.parse()?;
    let mut ctx = load_context_for_write(&options.global)?;
    let id = ctx.engine.resolve(&options.id)?.id().to_string();
    let today = ctx.engine.today();
    let tiers = ctx.config.display.streak_tiers.clone();

    let habit = ctx
        .engine
        .move_habit(&id, status)
        .cloned()
        .ok_or_else(|| Error::HabitNotFound(id.clone()))?;

    let mut human = HumanOutput::new(format!("Moved to {status}: {}", habit.name()));
    human.push_summary("Streak", habit.streak().to_string());
    human.push_summary("Done today", if habit.completed_today() { "yes" } else { "no" });

    let output = HabitShowOutput {
        habit: HabitView::new(&habit, today, &tiers),
    };
    push_persist_warning(&ctx.engine, &mut human);

    emit_success(output_options(&options.global), "move", &output, Some(&human))
}

pub fn run_rm(options: IdOptions) -> Result<()> {
    let mut ctx = load_context_for_write(&options.global)?;
    let id = ctx.engine.resolve(&options.id)?.id().to_string();

    let removed = ctx
        .engine
        .delete_habit(&id)
        .ok_or_else(|| Error::HabitNotFound(id.clone()))?;

    let output = HabitRemovedOutput {
        id: removed.id().to_string(),
        name: removed.name().to_string(),
    };

    let mut human = HumanOutput::new(format!("Habit deleted: {}", removed.name()));
    human.push_summary("ID", removed.id());
    push_persist_warning(&ctx.engine, &mut human);

    emit_success(output_options(&options.global), "rm", &output, Some(&human))
}

pub fn run_palette(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let palette = &ctx.config.habits.palette;
    let default = ctx.config.habits.default_color().map(|c| c.name.as_str());

    let mut human = HumanOutput::new("Palette");
    for color in palette {
        if Some(color.name.as_str()) == default {
            human.push_detail(format!("{} {} (default)", color.name, color.hex));
        } else {
            human.push_detail(format!("{} {}", color.name, color.hex));
        }
    }

    let output = PaletteOutput {
        default,
        colors: palette,
    };
    emit_success(output_options(&global), "palette", &output, Some(&human))
}
