mod support;

use assert_cmd::Command;
use predicates::str::contains;

use support::TestHome;

#[test]
fn habit_help_works() {
    Command::cargo_bin("habit")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("daily habit tracking"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init", "add", "list", "today", "done", "rm", "progress", "heatmap", "stats", "owner",
        "seed",
    ];

    for cmd in subcommands {
        Command::cargo_bin("habit")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn init_creates_store_and_config_once() {
    let home = TestHome::new();

    let data = home.json(&["init"]);
    assert_eq!(data["created"]["store"], true);
    assert_eq!(data["created"]["config"], true);
    assert!(home.store_file().exists());
    assert!(home.path().join("habit.toml").exists());

    let again = home.json(&["init"]);
    assert_eq!(again["created"]["store"], false);
    assert_eq!(again["created"]["config"], false);

    home.habit()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("nothing to do"));
}

#[test]
fn quiet_suppresses_human_output() {
    let home = TestHome::new();
    home.habit()
        .args(["--quiet", "add", "Stretch"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn invalid_reference_day_is_validation_error() {
    let home = TestHome::new();
    let envelope = home.json_error(&["--today", "2024-13-01", "stats"], 2);
    assert_eq!(envelope["error"]["kind"], "validation");
    assert_eq!(envelope["command"], "stats");
}

#[test]
fn corrupt_store_is_storage_failure() {
    let home = TestHome::new();
    std::fs::write(home.store_file(), "not json").expect("write store");

    let envelope = home.json_error(&["stats"], 4);
    assert_eq!(envelope["error"]["kind"], "storage");
    assert_eq!(envelope["error"]["message"], "Storage operation failed");
    assert_eq!(envelope["next_steps"][0], "retry the command");

    home.habit()
        .arg("stats")
        .assert()
        .code(4)
        .stderr(contains("hint: retry the command"));
}
