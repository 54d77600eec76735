//! End-to-end interpreter scenarios: stdout, stderr, and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write `source` to a script file and run it.
fn run_script(source: &str) -> assert_cmd::assert::Assert {
    let dir = TempDir::new().expect("create temp directory");
    let path = dir.path().join("script.lox");
    std::fs::write(&path, source).expect("write script");

    Command::new(crate::rlox_bin()).arg(&path).assert()
}

#[test]
fn test_prints_sum() {
    run_script("print 1 + 2;").success().stdout("3\n");
}

#[test]
fn test_concatenates_strings() {
    run_script("var a = \"st\"; var b = \"r\"; print a + b + \"ing\";")
        .success()
        .stdout("string\n");
}

#[test]
fn test_while_loop_counts() {
    run_script("var x = 0; while (x < 3) { print x; x = x + 1; }")
        .success()
        .stdout("0\n1\n2\n");
}

#[test]
fn test_if_with_and() {
    run_script("if (true and 1 < 2) print \"y\"; else print \"n\";")
        .success()
        .stdout("y\n");
}

#[test]
fn test_undefined_variable_is_runtime_error() {
    run_script("print undefined;")
        .failure()
        .code(70)
        .stdout("")
        .stderr(
            predicate::str::contains("Undefined variable 'undefined'.")
                .and(predicate::str::contains("[line 1] in script")),
        );
}

#[test]
fn test_block_shadowing() {
    run_script("var a = 1; { var a = 2; print a; } print a;")
        .success()
        .stdout("2\n1\n");
}

#[test]
fn test_missing_semicolon_is_compile_error() {
    run_script("print 1")
        .failure()
        .code(65)
        .stdout("")
        .stderr(predicate::str::contains(
            "[line 1] Error at end: Expect ';' after value.",
        ));
}

#[test]
fn test_unterminated_string_is_compile_error() {
    run_script("print \"oops;")
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Unterminated string."));
}

#[test]
fn test_invalid_assignment_target_is_compile_error() {
    run_script("var a = 1; var b = 2; a + b = 3;")
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Invalid assignment target."));
}

#[test]
fn test_runtime_error_reports_correct_line() {
    run_script("var fine = 1;\nprint fine;\nprint fine + \"s\";\n")
        .failure()
        .code(70)
        .stdout("1\n")
        .stderr(
            predicate::str::contains("Operands must be two numbers or two strings.")
                .and(predicate::str::contains("[line 3] in script")),
        );
}

#[test]
fn test_multiline_string_literal() {
    run_script("print \"line1\nline2\";")
        .success()
        .stdout("line1\nline2\n");
}

#[test]
fn test_division_follows_ieee() {
    run_script("print 1 / 0; print -1 / 0;")
        .success()
        .stdout("inf\n-inf\n");
}

#[test]
fn test_repl_interprets_lines_and_keeps_globals() {
    Command::new(crate::rlox_bin())
        .write_stdin("var a = 40;\nprint a + 2;\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("> ")
                .and(predicate::str::contains("42")),
        );
}

#[test]
fn test_repl_recovers_after_error() {
    Command::new(crate::rlox_bin())
        .write_stdin("print undefined;\nprint 2;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2"))
        .stderr(predicate::str::contains("Undefined variable 'undefined'."));
}

#[test]
fn test_usage_error_with_two_scripts() {
    let dir = TempDir::new().expect("create temp directory");
    let first = dir.path().join("one.lox");
    let second = dir.path().join("two.lox");
    std::fs::write(&first, "print 1;").expect("write script");
    std::fs::write(&second, "print 2;").expect("write script");

    Command::new(crate::rlox_bin())
        .arg(&first)
        .arg(&second)
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Usage: rlox [script]"));
}

#[test]
fn test_missing_script_is_io_error() {
    Command::new(crate::rlox_bin())
        .arg("no-such-script.lox")
        .assert()
        .failure()
        .code(74)
        .stderr(predicate::str::contains("could not read"));
}
