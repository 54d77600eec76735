//! CLI surface tests: flags, config file, and debug switches.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_help() {
    Command::new(crate::rlox_bin())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").or(predicate::str::contains("rlox")));
}

#[test]
fn test_cli_version() {
    Command::new(crate::rlox_bin())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rlox"));
}

#[test]
fn test_print_code_disassembles_to_stderr() {
    let dir = TempDir::new().expect("create temp directory");
    let path = dir.path().join("script.lox");
    std::fs::write(&path, "print 1;").expect("write script");

    Command::new(crate::rlox_bin())
        .arg("--print-code")
        .arg(&path)
        .assert()
        .success()
        .stdout("1\n")
        .stderr(
            predicate::str::contains("== script ==")
                .and(predicate::str::contains("OP_CONSTANT"))
                .and(predicate::str::contains("OP_RETURN")),
        );
}

#[test]
fn test_trace_flag_does_not_disturb_output() {
    let dir = TempDir::new().expect("create temp directory");
    let path = dir.path().join("script.lox");
    std::fs::write(&path, "print 1 + 2;").expect("write script");

    Command::new(crate::rlox_bin())
        .arg("--trace")
        .arg(&path)
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_config_file_enables_print_code() {
    let dir = TempDir::new().expect("create temp directory");
    let script = dir.path().join("script.lox");
    let config = dir.path().join("rlox.toml");
    std::fs::write(&script, "print 1;").expect("write script");
    std::fs::write(&config, "print-code = true\n").expect("write config");

    Command::new(crate::rlox_bin())
        .arg("--config")
        .arg(&config)
        .arg(&script)
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("== script =="));
}

#[test]
fn test_malformed_config_fails_before_running() {
    let dir = TempDir::new().expect("create temp directory");
    let script = dir.path().join("script.lox");
    let config = dir.path().join("rlox.toml");
    std::fs::write(&script, "print 1;").expect("write script");
    std::fs::write(&config, "print-code = \"yes\"\n").expect("write config");

    Command::new(crate::rlox_bin())
        .arg("--config")
        .arg(&config)
        .arg(&script)
        .assert()
        .failure()
        .code(78)
        .stdout("")
        .stderr(predicate::str::contains("invalid configuration"));
}
