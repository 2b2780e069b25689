//! Process-level startup tests
//!
//! Covers the fatal-startup path: with required configuration missing, the
//! daemon must exit non-zero before binding anything.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_missing_configuration_exits_before_startup() {
    Command::cargo_bin("feedsweep")
        .unwrap()
        .env_clear()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FEEDSWEEP_APP_NAME"));
}

#[test]
fn test_partially_missing_configuration_names_the_variable() {
    Command::cargo_bin("feedsweep")
        .unwrap()
        .env_clear()
        .env("FEEDSWEEP_APP_NAME", "sweeper")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn test_version_subcommand() {
    Command::cargo_bin("feedsweep")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("feedsweep")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
