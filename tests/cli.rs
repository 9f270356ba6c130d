use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: get a Command for the tether binary pointed at throwaway
/// config/data/home directories.
fn tether(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tether").expect("tether binary not found");
    cmd.env("TETHER_CONFIG_DIR", dir.path().join("config"))
        .env("TETHER_DATA_DIR", dir.path().join("data"))
        .env("HOME", dir.path().join("home"));
    cmd
}

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data").join("connections.txt")
}

#[test]
fn list_on_empty_store_is_informational() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No connections saved yet"));
}

#[test]
fn add_then_list_shows_the_profile() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args([
            "add",
            "web",
            "10.0.0.5",
            "--key",
            "web.pem",
            "--description",
            "prod box",
            "--user",
            "ubuntu",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 'web'"));

    tether(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("ubuntu@10.0.0.5"))
        .stdout(predicate::str::contains("prod box"));
}

#[test]
fn add_writes_the_pipe_delimited_wire_format() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args([
            "add", "web", "10.0.0.5", "--key", "web.pem", "--description", "prod box",
            "--user", "ubuntu",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(store_path(&dir)).unwrap();
    assert_eq!(contents, "web|prod box|10.0.0.5|ubuntu|web.pem\n");
}

#[test]
fn add_appends_without_rewriting_existing_lines() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir)
        .args(["add", "db", "10.0.0.6", "--key", "db.pem"])
        .assert()
        .success();

    let contents = fs::read_to_string(store_path(&dir)).unwrap();
    assert_eq!(
        contents,
        "web|prod box|10.0.0.5|ubuntu|web.pem\ndb||10.0.0.6|root|db.pem\n"
    );
}

#[test]
fn add_defaults_the_user() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args(["add", "db", "10.0.0.6", "--key", "db.pem"])
        .assert()
        .success();

    let contents = fs::read_to_string(store_path(&dir)).unwrap();
    assert!(contents.contains("|root|"));
}

#[test]
fn add_rejects_separator_in_fields() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args(["add", "web|bad", "10.0.0.5", "--key", "web.pem"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not contain"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!store_path(&dir).exists());
}

#[test]
fn list_skips_malformed_lines_and_warns() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(
        store_path(&dir),
        "web|prod box|10.0.0.5|ubuntu|web.pem\nbroken|line\n",
    )
    .unwrap();

    tether(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("broken").not())
        .stderr(predicate::str::contains("skipped malformed record"));
}

#[test]
fn connect_on_empty_store_reports_empty() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .arg("connect")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No connections saved yet"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn connect_rejects_out_of_range_selection() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir)
        .arg("connect")
        .write_stdin("7\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid selection"));
}

#[test]
fn connect_rejects_non_numeric_selection() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir)
        .arg("connect")
        .write_stdin("abc\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid selection"));
}

#[test]
fn connect_quit_sentinel_backs_out_cleanly() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir).arg("connect").write_stdin("q\n").assert().success();
}

#[test]
fn connect_sub_menu_back_does_not_resolve_keys() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    // Select the profile, then back out of the sub-menu. The key does not
    // exist anywhere, so reaching key resolution would fail the run.
    tether(&dir)
        .arg("connect")
        .write_stdin("1\nb\n")
        .assert()
        .success();
}

#[test]
fn connect_by_unknown_name_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir)
        .args(["connect", "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No connection named 'db'"))
        .stderr(predicate::str::contains("tether list"));
}

#[test]
fn connect_by_name_reports_missing_key_with_both_paths() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store_path(&dir), "web|prod box|10.0.0.5|ubuntu|web.pem\n").unwrap();

    tether(&dir)
        .args(["connect", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key file 'web.pem' not found"))
        .stderr(predicate::str::contains("keys"))
        .stderr(predicate::str::contains(".ssh"));
}

#[test]
fn menu_quits_on_choice_three() {
    let dir = TempDir::new().unwrap();

    tether(&dir).write_stdin("3\n").assert().success();
}

#[test]
fn menu_reports_unknown_choice_and_keeps_running() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .write_stdin("9\n3\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unrecognized choice '9'"));
}

#[test]
fn menu_add_flow_persists_a_profile() {
    let dir = TempDir::new().unwrap();

    // 1 = add; then name, description, address, user (empty -> default), key; 3 = quit.
    tether(&dir)
        .write_stdin("1\nweb\nprod box\n10.0.0.5\nubuntu\nweb.pem\n3\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved 'web'"));

    let contents = fs::read_to_string(store_path(&dir)).unwrap();
    assert_eq!(contents, "web|prod box|10.0.0.5|ubuntu|web.pem\n");
}

#[test]
fn history_starts_empty() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet"));
}

#[test]
fn history_clear_succeeds_on_empty_store() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args(["history", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared"));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().unwrap();

    tether(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tether"));
}
