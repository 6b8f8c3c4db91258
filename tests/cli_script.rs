mod common;

use predicates::prelude::*;
use predicates::str::contains;

use common::{script, test_home};

#[test]
fn script_mode_runs_basic_flow() {
    let home = test_home();
    script(
        &home,
        "add \"Disney Plus\" 13.99 monthly streaming 2025-04-20 --notes \"family plan\"\n\
         toggle \"Disney Plus\"\n\
         list --all --category streaming\n",
    )
    .success()
    .stdout(contains("Added `Disney Plus`"))
    .stdout(contains("`Disney Plus` paused."))
    .stdout(contains("[paused]"));

    let snapshot =
        std::fs::read_to_string(home.join("data").join("subscriptions.json")).expect("snapshot");
    assert!(snapshot.contains("\"Disney Plus\""));
    assert!(snapshot.contains("\"family plan\""));
}

#[test]
fn script_mode_reports_errors_and_keeps_going() {
    let home = test_home();
    script(
        &home,
        "lsit\n\
         add Broken abc monthly music 2025-05-01\n\
         # comments are skipped\n\
         summary\n",
    )
    .success()
    .stdout(contains("Suggestion: `list`?"))
    .stderr(contains("Unknown command `lsit`"))
    .stderr(contains("Validation failed"))
    .stdout(contains("Dashboard (2025-04-14)"));
}

#[test]
fn exit_stops_the_script() {
    let home = test_home();
    script(&home, "exit\nsummary\n")
        .success()
        .stdout(contains("Dashboard").not());
}

#[test]
fn config_changes_apply_within_the_script() {
    let home = test_home();
    script(&home, "config set currency eur\nsummary\n")
        .success()
        .stdout(contains("Set `currency` to EUR."))
        .stdout(contains("€78.97"));

    let config = std::fs::read_to_string(home.join("config").join("config.json")).expect("config");
    assert!(config.contains("\"EUR\""));
}

#[test]
fn backups_accumulate_and_restore() {
    let home = test_home();
    script(
        &home,
        "delete Netflix\n\
         backup list\n\
         backup restore 1\n\
         list Netflix\n",
    )
    .success()
    .stdout(contains("Deleted `Netflix`."))
    .stdout(contains("subscriptions_"))
    .stdout(contains("Restored 3 subscription(s)"))
    .stdout(contains("Netflix"));
}
