//! Binary-level tests for the `shipwright` executable.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

const REGISTRY: &str = r#"
vessel:
  description: Ship commands
  commands:
    tour-ship:
      description: Tour the ship
probe:
  description: Survey unexplored code
  commands:
    map-planet:
      description: Map the planet surface
      aliases: [map]
"#;

fn project(registry: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(
        root.join("shipwright.toml"),
        "[project]\npackage = \"starship\"\nprogram = \"starship\"\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("src/starship")).unwrap();
    fs::write(root.join("src/starship/commands-list.yml"), registry).unwrap();
    fs::write(
        root.join("pyproject.toml"),
        "[project]\nname = \"starship\"\n\n[project.scripts]\n",
    )
    .unwrap();
    fs::write(root.join("src/starship/cli.py"), "import click\n").unwrap();
    dir
}

fn shipwright(root: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("shipwright");
    cmd.current_dir(root)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--root")
        .arg(root);
    cmd
}

fn cli_py(root: &Path) -> PathBuf {
    root.join("src/starship/commands/probe/map_planet/cli.py")
}

#[test]
fn help_lists_the_flags() {
    cargo::cargo_bin_cmd!("shipwright")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--fix-file"))
        .stdout(predicate::str::contains("--registry"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("shipwright")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn sync_then_up_to_date() {
    let dir = project(REGISTRY);
    let root = dir.path();

    shipwright(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Synchronized 6 aliases"))
        .stdout(predicate::str::contains("+ map -> starship.commands.probe.map_planet.cli:map_planet_command"));

    let pyproject = fs::read_to_string(root.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("# [AUTO-GENERATED START: entry-points]"));
    assert!(pyproject.contains("starship = \"starship.cli:main\""));
    assert!(cli_py(root).exists());

    shipwright(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date (6 aliases)"));
}

#[test]
fn check_reports_drift_without_writing() {
    let dir = project(REGISTRY);
    let root = dir.path();
    let before = fs::read_to_string(root.join("pyproject.toml")).unwrap();

    shipwright(root)
        .arg("--check")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Would create"))
        .stderr(predicate::str::contains("out of date"));

    assert_eq!(fs::read_to_string(root.join("pyproject.toml")).unwrap(), before);
    assert!(!root.join("src/starship/commands").exists());

    shipwright(root).assert().success();
    shipwright(root).arg("--check").assert().success();
}

#[test]
fn conflicts_exit_two_with_a_table() {
    let dir = project(
        r#"
transmission:
  commands:
    scan-sector:
      aliases: [scan]
vessel:
  commands:
    sweep:
      aliases: [scan]
"#,
    );
    let root = dir.path();
    let before = fs::read_to_string(root.join("pyproject.toml")).unwrap();

    shipwright(root)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Alias | Conflict Details"))
        .stderr(predicate::str::contains("scan"));

    assert_eq!(fs::read_to_string(root.join("pyproject.toml")).unwrap(), before);
}

#[test]
fn reserved_list_flag_is_honoured() {
    let dir = project(REGISTRY);
    let root = dir.path();
    let reserved = root.join("reserved.txt");
    fs::write(&reserved, "# not allowed\nmap\n").unwrap();

    shipwright(root)
        .arg("--reserved")
        .arg(&reserved)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reserved and cannot be used"));
}

#[test]
fn missing_registry_is_a_user_error() {
    let dir = project(REGISTRY);
    shipwright(dir.path())
        .args(["--registry", "nope.yml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.yml"));
}

#[test]
fn missing_config_file_exits_four() {
    let dir = project(REGISTRY);
    shipwright(dir.path())
        .args(["--config", "missing.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn json_summary() {
    let dir = project(REGISTRY);
    let out = shipwright(dir.path())
        .args(["--output-format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary["alias_count"], 6);
    assert_eq!(summary["mode"], "apply");
    assert_eq!(summary["aliases"]["added"].as_array().unwrap().len(), 6);
}

#[test]
fn fix_file_adds_the_service_import_once() {
    let dir = project(REGISTRY);
    let root = dir.path();
    shipwright(root).assert().success();

    let path = cli_py(root);
    fs::write(&path, "#!/usr/bin/env python3\nimport click\n").unwrap();

    shipwright(root)
        .arg("--fix-file")
        .arg("src/starship/commands/probe/map_planet/cli.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added service import"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#!/usr/bin/env python3\nfrom .services import map_planet_service\nimport click\n"
    );

    shipwright(root)
        .arg("--fix-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("already imports"));
}

#[test]
fn fix_file_outside_a_package_exits_three() {
    let dir = project(REGISTRY);
    let root = dir.path();
    shipwright(root)
        .arg("--fix-file")
        .arg(root.join("src/starship/cli.py"))
        .assert()
        .code(3);
}

#[test]
fn completions_for_bash() {
    cargo::cargo_bin_cmd!("shipwright")
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shipwright"));
}

#[test]
fn quiet_and_verbose_conflict() {
    cargo::cargo_bin_cmd!("shipwright")
        .args(["--quiet", "--verbose"])
        .assert()
        .code(2);
}

#[test]
fn no_color_accepts_any_non_empty_value() {
    let dir = project(REGISTRY);
    let root = dir.path();
    for value in ["1", "yes", "true"] {
        shipwright(root)
            .env("NO_COLOR", value)
            .args(["--output-format", "human"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn fix_file_accepts_a_dotted_root() {
    let dir = project(REGISTRY);
    let root = dir.path();
    shipwright(root).assert().success();

    let dotted = root.join("src").join("..");
    let mut cmd = cargo::cargo_bin_cmd!("shipwright");
    cmd.current_dir(root)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--root")
        .arg(&dotted)
        .arg("--fix-file")
        .arg(cli_py(root))
        .assert()
        .success()
        .stdout(predicate::str::contains("already imports"));
}
