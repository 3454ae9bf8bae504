use std::fs;

use habits::config::{Config, CONFIG_FILE};
use habits::error::Error;

#[test]
fn config_defaults_when_missing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = Config::load_from_dir(dir.path())?;

    assert_eq!(config.storage.key, "habit-tracker-data");
    assert_eq!(config.habits.default_target_days, 30);
    assert_eq!(config.habits.max_target_days, 365);
    assert_eq!(config.habits.palette[0].name, "emerald");
    assert_eq!(config.display.streak_tiers.building, 3);
    assert_eq!(config.display.streak_tiers.strong, 7);
    assert_eq!(config.display.streak_tiers.legendary, 30);
    Ok(())
}

#[test]
fn config_partial_overrides_keep_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(CONFIG_FILE),
        "[engine]\nrecompute_streak_on_load = true\n",
    )?;

    let config = Config::load_from_dir(dir.path())?;
    assert!(config.engine.recompute_streak_on_load);
    assert_eq!(config.habits.palette.len(), 8);
    assert_eq!(config.storage.lock_timeout_ms, 5000);
    Ok(())
}

#[test]
fn config_rejects_bad_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(CONFIG_FILE);

    let cases = [
        "[storage]\nkey = \"../escape\"\n",
        "[storage]\nlock_timeout_ms = 0\n",
        "[habits]\ndefault_target_days = 400\n",
        "[display.streak_tiers]\nbuilding = 7\nstrong = 7\n",
    ];
    for case in cases {
        fs::write(&path, case)?;
        assert!(
            matches!(Config::load(&path), Err(Error::InvalidConfig(_))),
            "expected rejection for {case:?}"
        );
    }

    fs::write(&path, "[habits\n")?;
    assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    Ok(())
}

#[test]
fn palette_lookup_is_case_insensitive() {
    let config = Config::default();
    let by_name = config.habits.resolve_color("AMBER").expect("amber");
    assert_eq!(by_name.hex, "#f59e0b");
    let by_hex = config.habits.resolve_color("#EF4444").expect("red");
    assert_eq!(by_hex.name, "red");
    assert!(config.habits.resolve_color("mauve").is_err());
}
