//! Binary-level tests: argument handling, exit codes and read-only commands.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const GEMFILE: &str = "source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 8.0.2\"\n\ngroup :development, :test do\n  gem \"debug\"\nend\n\ngroup :development do\n  gem \"web-console\"\nend\n";

fn railkit() -> Command {
    let mut cmd = Command::cargo_bin("railkit").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("railkit.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    railkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn features_lists_keys_and_override_names() {
    railkit()
        .args(["features", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("image_uploading_cloudinary"))
        .stdout(predicate::str::contains("DEV_TOOLS"));
}

#[test]
fn features_as_json() {
    railkit()
        .args(["--output-format", "json", "features"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"ruby_llm\""));
}

#[test]
fn status_outside_a_rails_app_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    railkit()
        .arg("status")
        .arg(dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no Gemfile"));
}

#[test]
fn status_reports_nothing_installed_on_fresh_app() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Gemfile"), GEMFILE).unwrap();
    railkit()
        .args(["--output-format", "json", "status"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"installed\": true").not())
        .stdout(predicate::str::contains("\"feature\": \"devise\""));
}

#[test]
fn unknown_feature_is_rejected() {
    railkit()
        .args(["install", "sidekiq"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown feature"));
}

#[test]
fn conflicting_overrides_are_a_user_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Gemfile"), GEMFILE).unwrap();
    railkit()
        .arg("setup")
        .arg(dir.path())
        .args(["--dry-run", "--non-interactive", "--enable", "admin", "--disable", "admin"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("both enabled and disabled"));
}

#[test]
fn dry_run_reports_plan_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let gemfile = dir.path().join("Gemfile");
    std::fs::write(&gemfile, GEMFILE).unwrap();

    railkit()
        .args(["--output-format", "json", "setup"])
        .arg(dir.path())
        .args(["--dry-run", "--non-interactive", "--enable", "testing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dry_run\": true"))
        .stdout(predicate::str::contains("\"testing\""));

    assert_eq!(std::fs::read_to_string(&gemfile).unwrap(), GEMFILE);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn config_file_values_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[project]\npreset = \"tailwind\"\n");
    railkit()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "project.preset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project.preset = tailwind"));
}

#[test]
fn unknown_config_key_is_a_configuration_error() {
    railkit()
        .args(["config", "get", "project.language"])
        .assert()
        .code(4);
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    railkit()
        .args(["--config", "/nonexistent/railkit.toml", "features"])
        .assert()
        .code(4);
}

#[test]
fn local_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();
    railkit()
        .current_dir(dir.path())
        .args(["init", "--local"])
        .assert()
        .success();
    let written = std::fs::read_to_string(dir.path().join("railkit.toml")).unwrap();
    assert!(written.contains("rails_version = \"8\""));
    assert!(written.contains("target_model = \"User\""));
}

#[test]
fn completions_are_generated() {
    railkit()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("railkit"));
}
