use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("atime-backup").unwrap();
    cmd.env("ATIME_BACKUP_DIR", config_dir)
        .env_remove("ATIME_BACKUP_LOG");
    cmd
}

/// Every `*.nk.autosave` file under `<root>/.autosave/*/`
fn backups_under(root: &Path) -> Vec<PathBuf> {
    let autosave = root.join(".autosave");
    if !autosave.exists() {
        return Vec::new();
    }
    let mut found = Vec::new();
    for day in fs::read_dir(autosave).unwrap() {
        let day = day.unwrap().path();
        for file in fs::read_dir(day).unwrap() {
            let file = file.unwrap().path();
            if file.to_string_lossy().ends_with(".nk.autosave") {
                found.push(file);
            }
        }
    }
    found
}

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config");
    let proj = temp.path().join("proj");
    fs::create_dir(&proj).unwrap();
    let source = proj.join("shot.nk.autosave");
    fs::write(&source, "Root {}\n").unwrap();
    (temp, config, source)
}

#[test]
fn init_writes_settings() {
    let (_temp, config, _source) = setup();

    cmd(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    let contents = fs::read_to_string(config.join("settings.json")).unwrap();
    assert!(contents.contains("checkpoint_time"));
    assert!(contents.contains("\"interval_minutes\": 15"));
}

#[test]
fn tick_right_after_init_is_not_due() {
    let (_temp, config, source) = setup();
    cmd(&config).arg("init").assert().success();

    cmd(&config)
        .args(["tick", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not due yet"));

    assert!(backups_under(source.parent().unwrap()).is_empty());
}

#[test]
fn forced_tick_writes_timestamped_copy() {
    let (_temp, config, source) = setup();
    cmd(&config).arg("init").assert().success();

    cmd(&config)
        .args(["tick", "--force", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("script:"));

    let backups = backups_under(source.parent().unwrap());
    assert_eq!(backups.len(), 1);
    let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("shot_"), "unexpected name {}", name);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "Root {}\n");
}

#[test]
fn tick_with_missing_source_writes_nothing() {
    let (_temp, config, source) = setup();
    cmd(&config).arg("init").assert().success();
    let before = fs::read_to_string(config.join("settings.json")).unwrap();
    let missing = source.with_file_name("other.nk.autosave");

    cmd(&config)
        .args(["tick", "--force", "--source"])
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("Autosave file not found"));

    assert!(backups_under(source.parent().unwrap()).is_empty());
    assert_eq!(
        fs::read_to_string(config.join("settings.json")).unwrap(),
        before
    );
}

#[test]
fn watch_uses_configured_source_and_local_path() {
    let (temp, config, source) = setup();
    let local = temp.path().join("local");
    fs::create_dir_all(&config).unwrap();
    fs::write(
        config.join("settings.json"),
        settings_json(&source, &local),
    )
    .unwrap();

    cmd(&config)
        .args(["watch", "--period-secs", "0", "--max-ticks", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local:"));

    assert_eq!(backups_under(source.parent().unwrap()).len(), 1);
    assert_eq!(backups_under(&local).len(), 1);

    let settings = fs::read_to_string(config.join("settings.json")).unwrap();
    assert!(!settings.contains("2000-01-01 00:00:00"));
}

fn settings_json(source: &Path, local: &Path) -> String {
    format!(
        r#"{{
  "enabled": true,
  "interval_minutes": 15,
  "retention_ceiling": 10,
  "local_enabled": true,
  "local_path": {local:?},
  "autosave_path": {source:?},
  "checkpoint_time": "2000-01-01 00:00:00"
}}"#,
        local = local.to_string_lossy(),
        source = source.to_string_lossy(),
    )
}

#[test]
fn disabled_backups_skip_cycle() {
    let (_temp, config, source) = setup();
    cmd(&config).arg("init").assert().success();
    cmd(&config).arg("disable").assert().success();

    cmd(&config)
        .args(["tick", "--force", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));

    assert!(backups_under(source.parent().unwrap()).is_empty());
}

#[test]
fn zero_copies_is_rejected() {
    let (_temp, config, _source) = setup();

    cmd(&config)
        .args(["set", "copies", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("retention_ceiling"));
}

#[test]
fn folder_local_uses_configured_path() {
    let (temp, config, _source) = setup();
    let local = temp.path().join("local");

    cmd(&config)
        .args(["local", "set-path"])
        .arg(&local)
        .assert()
        .success();

    cmd(&config)
        .args(["folder", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            local.join(".autosave").to_string_lossy().into_owned(),
        ));
}

#[test]
fn folder_script_without_source_fails() {
    let (_temp, config, _source) = setup();

    cmd(&config)
        .args(["folder", "script"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No autosave path configured"));
}

#[test]
fn list_shows_written_backups() {
    let (_temp, config, source) = setup();
    cmd(&config).arg("init").assert().success();
    cmd(&config)
        .args(["tick", "--force", "--source"])
        .arg(&source)
        .assert()
        .success();

    cmd(&config)
        .args(["list", "script", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}
