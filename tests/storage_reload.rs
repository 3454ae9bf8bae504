use std::fs;

use habits::day::{Day, FixedClock};
use habits::engine::{EngineOptions, HabitEngine};
use habits::habit::{BoardStatus, NewHabit};
use habits::lock::{lock_path_for, FileLock};
use habits::storage::{FileStore, HabitStore};
use tempfile::TempDir;

fn engine_on(dir: &TempDir, today: &str) -> HabitEngine<FileStore, FixedClock> {
    HabitEngine::load(
        FileStore::new(dir.path()),
        FixedClock(Day::parse(today).expect("day")),
        EngineOptions::default(),
    )
}

#[test]
fn file_store_survives_restart() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    let mut engine = engine_on(&dir, "2024-05-10");
    let mut input = NewHabit::new("Read", "#10b981");
    input.description = Some("before bed".to_string());
    input.target_days = Some(30);
    let id = engine.add_habit(input)?.id().to_string();
    engine.toggle_habit_complete(&id);
    let saved = engine.habits().to_vec();
    drop(engine);

    let engine = engine_on(&dir, "2024-05-10");
    assert_eq!(engine.habits(), saved.as_slice());
    assert!(engine.last_persist_error().is_none());

    let raw = fs::read_to_string(dir.path().join("habit-tracker-data.json"))?;
    assert!(raw.contains("\"completedDates\""));
    assert!(raw.contains("\"before bed\""));
    Ok(())
}

#[test]
fn held_lock_fails_save_but_keeps_memory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("habits.toml"),
        "[storage]\nlock_timeout_ms = 50\n",
    )?;
    let config = habits::config::Config::load_from_dir(dir.path())?;
    let store = FileStore::from_config(dir.path(), &config.storage);
    let data_file = store.data_file();
    let mut engine = HabitEngine::load(
        store,
        FixedClock(Day::parse("2024-05-10")?),
        EngineOptions::from_config(&config),
    );

    let _held = FileLock::acquire(lock_path_for(&data_file), 50)?;
    let id = engine
        .add_habit(NewHabit::new("Read", "#10b981"))?
        .id()
        .to_string();
    assert!(engine.last_persist_error().is_some());
    assert_eq!(engine.find(&id).map(|h| h.status()), Some(BoardStatus::Todo));
    assert!(engine.store().load()?.is_none());
    Ok(())
}

#[test]
fn lock_held_at_load_never_overwrites_stored_habits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    let mut engine = engine_on(&dir, "2024-05-10");
    engine.add_habit(NewHabit::new("Read", "#10b981"))?;
    engine.add_habit(NewHabit::new("Walk", "#3b82f6"))?;
    drop(engine);

    let config = habits::config::StorageConfig {
        key: "habit-tracker-data".to_string(),
        lock_timeout_ms: 50,
    };
    let store = FileStore::from_config(dir.path(), &config);
    let held = FileLock::acquire(lock_path_for(&store.data_file()), 50)?;
    let mut engine = HabitEngine::load(
        store,
        FixedClock(Day::parse("2024-05-10")?),
        EngineOptions::default(),
    );
    drop(held);

    assert!(engine.habits().is_empty());
    assert!(engine.is_read_only());
    assert!(engine.load_error().is_some());

    engine.add_habit(NewHabit::new("Stretch", "#f59e0b"))?;
    assert!(engine.last_persist_error().is_some());

    let on_disk = engine.store().load()?.expect("stored habits");
    let names: Vec<&str> = on_disk.iter().map(|h| h.name()).collect();
    assert_eq!(names, ["Read", "Walk"]);
    Ok(())
}
