use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;

#[test]
fn test_help_describes_the_backup_steps() {
    Command::new(cargo::cargo_bin!("ghbackup"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--download-path"))
        .stdout(predicate::str::contains("--skip-releases"))
        .stdout(predicate::str::contains("--skip-archive"));
}

#[test]
fn test_version_flag() {
    Command::new(cargo::cargo_bin!("ghbackup"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghbackup"));
}

#[test]
fn test_missing_required_arguments_fail() {
    Command::new(cargo::cargo_bin!("ghbackup"))
        .env_remove("GITHUB_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user"));
}

#[test]
fn test_rejects_unknown_flag() {
    Command::new(cargo::cargo_bin!("ghbackup"))
        .arg("--definitely-not-a-flag")
        .assert()
        .failure();
}
