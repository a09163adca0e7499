use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("piecraft-cli")?)
}

#[test]
fn show_prints_defaults_without_creating_file() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "show",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"branding\": \"WizardTim.com\""))
        .stdout(predicate::str::contains("\"paper\": \"a4\""));
    assert!(!workspace.path().join(".piecraft").exists());
    Ok(())
}

#[test]
fn reset_backs_up_and_restores_defaults() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let prefs_dir = workspace.path().join(".piecraft");
    fs::create_dir_all(&prefs_dir)?;
    let prefs_path = prefs_dir.join("preferences.json");
    fs::write(
        &prefs_path,
        r#"{ "version": 1, "export": { "branding": "Pie Guild" } }"#,
    )?;

    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "reset",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset preferences"));

    let restored = fs::read_to_string(&prefs_path)?;
    assert!(restored.contains("WizardTim.com"));
    let backup = fs::read_to_string(prefs_dir.join("preferences.bak"))?;
    assert!(backup.contains("Pie Guild"));
    Ok(())
}

#[test]
fn malformed_preferences_are_reported() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let prefs_dir = workspace.path().join(".piecraft");
    fs::create_dir_all(&prefs_dir)?;
    fs::write(prefs_dir.join("preferences.json"), "{ not json")?;

    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "show",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load preferences"));
    Ok(())
}
