use habits::day::{Day, FixedClock};
use habits::engine::{EngineOptions, HabitEngine};
use habits::habit::{BoardStatus, NewHabit};
use habits::storage::{HabitStore, MemoryStore};

fn day(raw: &str) -> Day {
    Day::parse(raw).expect("valid day")
}

fn load(store: MemoryStore, today: &str) -> HabitEngine<MemoryStore, FixedClock> {
    HabitEngine::load(store, FixedClock(day(today)), EngineOptions::default())
}

#[test]
fn three_day_run_extends_to_four() {
    let raw = r##"[{
        "id": "h1",
        "name": "Read",
        "color": "#10b981",
        "streak": 3,
        "completedToday": false,
        "completedDates": ["2024-05-07", "2024-05-08", "2024-05-09"],
        "lastCompletedDate": "2024-05-09",
        "status": "todo"
    }]"##;
    let mut engine = load(MemoryStore::with_raw(raw), "2024-05-10");

    let habit = engine.toggle_habit_complete("h1").expect("habit");
    assert_eq!(habit.streak(), 4);
    assert!(habit.completed_today());
    assert_eq!(habit.status(), BoardStatus::Completed);
    assert_eq!(habit.last_completed_date(), Some(day("2024-05-10")));
}

#[test]
fn yesterday_and_day_before_make_three() {
    let raw = r##"[{
        "id": "h1",
        "name": "Meditate",
        "color": "#8b5cf6",
        "streak": 2,
        "completedDates": ["2024-05-08", "2024-05-09"],
        "lastCompletedDate": "2024-05-09",
        "status": "completed"
    }]"##;
    let mut engine = load(MemoryStore::with_raw(raw), "2024-05-10");
    assert_eq!(engine.habits()[0].status(), BoardStatus::Todo);

    let habit = engine.toggle_habit_complete("h1").expect("habit");
    assert_eq!(habit.streak(), 3);
}

#[test]
fn gap_resets_streak_to_one() {
    let raw = r##"[{
        "id": "h1",
        "name": "Read",
        "color": "#10b981",
        "streak": 2,
        "completedDates": ["2024-05-07", "2024-05-08"],
        "status": "todo"
    }]"##;
    let mut engine = load(MemoryStore::with_raw(raw), "2024-05-10");

    let habit = engine.toggle_habit_complete("h1").expect("habit");
    assert_eq!(habit.streak(), 1);
}

#[test]
fn reload_on_a_new_day_resets_board_but_keeps_history() {
    let mut engine = load(MemoryStore::new(), "2024-05-10");
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))
        .expect("add")
        .id()
        .to_string();
    engine.toggle_habit_complete(&id);

    let store = engine.into_store();
    let engine = load(store, "2024-05-11");
    let habit = engine.find(&id).expect("habit");
    assert!(!habit.completed_today());
    assert_eq!(habit.status(), BoardStatus::Todo);
    assert_eq!(habit.streak(), 1);
    assert!(habit.is_completed_on(day("2024-05-10")));
}

#[test]
fn reload_can_recompute_streaks() {
    let mut engine = load(MemoryStore::new(), "2024-05-10");
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))
        .expect("add")
        .id()
        .to_string();
    engine.toggle_habit_complete(&id);

    let options = EngineOptions {
        recompute_streak_on_load: true,
        ..EngineOptions::default()
    };
    let engine = HabitEngine::load(engine.into_store(), FixedClock(day("2024-05-12")), options);
    assert_eq!(engine.find(&id).expect("habit").streak(), 0);
}

#[test]
fn same_day_reload_keeps_completion() {
    let mut engine = load(MemoryStore::new(), "2024-05-10");
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))
        .expect("add")
        .id()
        .to_string();
    engine.toggle_habit_complete(&id);
    let before = engine.habits().to_vec();

    let engine = load(engine.into_store(), "2024-05-10");
    assert_eq!(engine.habits(), before.as_slice());
}

#[test]
fn clock_advance_within_one_engine() {
    let mut engine = load(MemoryStore::new(), "2024-05-10");
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))
        .expect("add")
        .id()
        .to_string();

    for _ in 0..5 {
        engine.toggle_habit_complete(&id);
        engine.clock_mut().advance(1);
    }
    engine.toggle_habit_complete(&id);

    let habit = engine.find(&id).expect("habit");
    assert_eq!(habit.streak(), 6);
    assert_eq!(habit.total_completions(), 6);
    assert_eq!(engine.stats().longest_streak, 6);
}

#[test]
fn every_mutation_is_saved() {
    let mut engine = load(MemoryStore::new(), "2024-05-10");
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))
        .expect("add")
        .id()
        .to_string();
    engine.move_habit(&id, BoardStatus::Completed);

    let stored = engine.store().load().expect("load").expect("stored");
    assert_eq!(stored, engine.habits());
    assert_eq!(engine.store().save_count(), 2);

    engine.delete_habit(&id);
    let stored = engine.store().load().expect("load").expect("stored");
    assert!(stored.is_empty());
}
