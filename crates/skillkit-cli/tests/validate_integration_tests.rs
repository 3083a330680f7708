//! Integration tests for `skillkit validate` exit codes and report output.

#![cfg(test)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const BODY: &str = "# Foo Bar\n\nThis skill walks through the full deployment workflow, \
                    including rollbacks, health checks and the post-release checklist.\n";

fn make_skill(root: &Path, name: &str, frontmatter: &str, body: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("create skill dir");
    fs::write(dir.join("SKILL.md"), format!("---\n{frontmatter}---\n{body}"))
        .expect("write SKILL.md");
    dir
}

fn skillkit() -> Command {
    let mut cmd = Command::cargo_bin("skillkit").expect("skillkit bin");
    cmd.env_remove("SKILLKIT_POLICY").env_remove("RUST_LOG");
    cmd
}

#[test]
fn valid_skill_exits_zero() {
    let root = tempdir().expect("tempdir");
    let dir = make_skill(
        root.path(),
        "foo-bar",
        "name: foo-bar\ndescription: Deploy services. Use when shipping a release.\n",
        BODY,
    );

    skillkit()
        .arg("validate")
        .arg(&dir)
        .assert()
        .success()
        .stdout(contains("Validating skill: "))
        .stdout(contains("Skill is valid!"));
}

#[test]
fn missing_descriptor_exits_one() {
    let root = tempdir().expect("tempdir");
    let dir = root.path().join("foo-bar");
    fs::create_dir_all(&dir).expect("create dir");

    skillkit()
        .arg("validate")
        .arg(&dir)
        .assert()
        .failure()
        .code(1)
        .stdout(contains("SKILL.md file not found"))
        .stderr(contains("skill validation failed with 1 error(s)"));
}

#[test]
fn warnings_pass_unless_strict() {
    let root = tempdir().expect("tempdir");
    let dir = make_skill(
        root.path(),
        "foo-bar",
        "name: foo-bar\ndescription: \"A short desc\"\n",
        BODY,
    );

    skillkit()
        .arg("validate")
        .arg(&dir)
        .assert()
        .success()
        .stdout(contains("Description is very short"))
        .stdout(contains("Consider adding 'when to use' guidance"))
        .stdout(contains("Skill is valid (with warnings)"));

    skillkit()
        .arg("validate")
        .arg(&dir)
        .arg("--strict")
        .assert()
        .failure()
        .code(1)
        .stdout(contains("Failed in strict mode due to warnings"))
        .stderr(contains("strict mode failed with 2 warning(s)"));
}

#[test]
fn json_report_carries_verdict() {
    let root = tempdir().expect("tempdir");
    let dir = make_skill(
        root.path(),
        "foo-bar",
        "name: Foo_Bar\ndescription: Deploy services. Use when shipping a release.\n",
        BODY,
    );

    let output = skillkit()
        .arg("validate")
        .arg(&dir)
        .arg("--json")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output).expect("valid json output");
    assert_eq!(value["skill"], "foo-bar");
    assert_eq!(value["verdict"], "invalid");
    assert_eq!(value["passed"], false);
    assert_eq!(value["summary"]["errors"], 1);
    assert_eq!(value["errors"][0]["rule"], "name-format");
    assert_eq!(value["warnings"][0]["rule"], "name-directory");
}

#[test]
fn policy_file_relaxes_thresholds() {
    let root = tempdir().expect("tempdir");
    let dir = make_skill(
        root.path(),
        "foo-bar",
        "name: foo-bar\ndescription: Use when testing\n",
        "Short body.",
    );
    let policy = root.path().join("policy.toml");
    fs::write(&policy, "description_min_len = 5\nbody_min_len = 5\n").expect("write policy");

    skillkit()
        .arg("--config")
        .arg(&policy)
        .arg("validate")
        .arg(&dir)
        .arg("--strict")
        .assert()
        .success()
        .stdout(contains("Skill is valid!"));
}

#[test]
fn unknown_policy_format_is_rejected() {
    let root = tempdir().expect("tempdir");
    let dir = make_skill(
        root.path(),
        "foo-bar",
        "name: foo-bar\ndescription: Use when testing\n",
        BODY,
    );
    let policy = root.path().join("policy.ini");
    fs::write(&policy, "body_min_len = 5\n").expect("write policy");

    skillkit()
        .arg("validate")
        .arg(&dir)
        .arg("--config")
        .arg(&policy)
        .assert()
        .failure()
        .stderr(contains("Unsupported policy format"));
}
