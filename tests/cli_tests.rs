//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn collect() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("collect"));
    cmd.env_remove("COLLECT_DEFAULT_SOURCE");
    cmd
}

fn file_url(path: &std::path::Path) -> String {
    url::Url::from_file_path(path).expect("file url").to_string()
}

#[test]
fn test_cli_version() {
    collect().arg("--version").assert().success().stdout(predicate::str::contains("collect"));
}

#[test]
fn test_cli_help() {
    collect()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve layered configuration"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_resolve_merges_file_and_flags() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("config.yml");
    fs::write(
        &config,
        "default:\n  host: localhost\n  port: 80\nprod:\n  <<: default\n  host: example.com\n",
    )
    .expect("write config");

    let url = file_url(&config);

    collect()
        .args(["resolve", "--value", "port", "--", "prod", "-source", url.as_str(), "-port", "8080"])
        .assert()
        .success()
        .stdout("host=example.com\nport=8080\n");
}

#[test]
fn test_resolve_relative_source_keeps_file_name_case() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("MyConfig.yml"), "name: mixed-case\n").expect("write config");

    collect()
        .current_dir(tmp.path())
        .args(["resolve", "--", "-source", "file://MyConfig.yml"])
        .assert()
        .success()
        .stdout("name=mixed-case\n");
}

#[test]
fn test_resolve_json_output() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("config.yml");
    fs::write(&config, "hosts: [a, b]\n").expect("write config");
    let url = file_url(&config);

    collect()
        .args(["resolve", "--format", "json", "--default-source", url.as_str(), "--", "extra"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""label": "extra""#))
        .stdout(predicate::str::contains(r#""hosts": ["#))
        .stdout(predicate::str::contains(url.as_str()));
}

#[test]
fn test_resolve_default_source_from_env() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("config.toml");
    fs::write(&config, "name = \"from-env\"\n").expect("write config");

    collect()
        .env("COLLECT_DEFAULT_SOURCE", file_url(&config))
        .args(["resolve"])
        .assert()
        .success()
        .stdout("name=from-env\n");
}

#[test]
fn test_resolve_reports_unknown_scheme() {
    collect()
        .args(["resolve", "--", "-source", "foo://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scheme could not be found: foo"));
}

#[test]
fn test_resolve_reports_nesting_depth() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("deep.yml");
    fs::write(&config, "prod:\n  db:\n    host: x\n").expect("write config");

    let url = file_url(&config);

    collect()
        .args(["resolve", "--", "-source", url.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file: only 2 levels of nesting allowed"));
}

#[test]
fn test_resolve_usage_lists_declared_flags() {
    collect()
        .args(["resolve", "--value", "port", "--switch", "debug", "--usage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn test_show_marks_selected_label() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("config.yml");
    fs::write(&config, "base:\n  image: alpine\nprod:\n  <<: base\n  replicas: 3\n")
        .expect("write config");

    let url = file_url(&config);

    collect()
        .args(["show", url.as_str(), "--label", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[base]\n  image=alpine\n"))
        .stdout(predicate::str::contains("[prod] (selected)\n  image=alpine\n  replicas=3\n"));
}

#[test]
fn test_show_rejects_other_schemes() {
    collect()
        .args(["show", "http://example.com/config.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only file:// documents"));
}
