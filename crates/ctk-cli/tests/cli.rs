//! # End-to-end tests for the `ctk` binary
//!
//! Each test runs the binary inside a temporary project directory with the
//! user-level config directory pointed at an empty location.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn ctk(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ctk"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("CTK_LOG")
        .output()
        .expect("ctk should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const TEST_FILE: &str = "\
#include \"unity.h\"
#include \"LedDriver.h\"

void setUp(void) {}
void tearDown(void) {}

void test_LedsOffAfterCreate(void)
{
    TEST_ASSERT_EQUAL_HEX16(0, virtualLeds);
}

void test_TurnOnLedOne(void)
{
    TEST_ASSERT_EQUAL_HEX16(1, virtualLeds);
}
";

#[test]
fn runner_writes_default_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("test_led.c"), TEST_FILE).expect("write test file");

    let output = ctk(dir.path(), &["runner", "test_led.c"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "Generated test_led_Runner.c (2 tests)\n");

    let runner = fs::read_to_string(dir.path().join("test_led_Runner.c")).expect("runner written");
    assert!(runner.contains("extern void test_LedsOffAfterCreate(void);"));
    assert!(runner.contains("RUN_TEST(test_TurnOnLedOne, 12);"));
    assert!(runner.contains("#include \"LedDriver.h\""));
}

#[test]
fn runner_json_lists_tests() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("test_led.c"), TEST_FILE).expect("write test file");

    let output = ctk(dir.path(), &["--format", "json", "runner", "test_led.c", "out/runner.c"]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(json["tests"][0], "test_LedsOffAfterCreate");
    assert_eq!(json["output"], "out/runner.c");
    assert!(dir.path().join("out/runner.c").exists());
}

#[test]
fn runner_reports_missing_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = ctk(dir.path(), &["runner", "nope.c"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ctk error: failed to generate a runner for nope.c"));
}

#[test]
fn module_generate_then_destroy() {
    let dir = tempfile::tempdir().expect("tempdir");

    let created = ctk(dir.path(), &["module", "Led", "--pattern", "dh"]);
    assert_eq!(created.status.code(), Some(0));
    assert!(stdout(&created).ends_with("Generate Complete\n"));
    assert!(dir.path().join("src/LedDriver.c").exists());
    assert!(dir.path().join("test/TestLedHardware.c").exists());

    let again = ctk(dir.path(), &["module", "Led", "--pattern", "dh"]);
    assert_eq!(again.status.code(), Some(1));

    let destroyed = ctk(dir.path(), &["module", "Led", "--pattern", "dh", "--destroy"]);
    assert_eq!(destroyed.status.code(), Some(0));
    assert!(!dir.path().join("src/LedDriver.c").exists());
}

#[test]
fn summary_exit_code_tracks_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("test_a.testpass"),
        "test/test_a.c:4:test_A:PASS\n-----------------------\n1 Tests 0 Failures 0 Ignored\nOK\n",
    )
    .expect("write pass");
    fs::write(
        dir.path().join("test_b.testfail"),
        "test/test_b.c:9:test_B:FAIL:Expected 1 Was 2\n-----------------------\n1 Tests 1 Failures 0 Ignored\nFAIL\n",
    )
    .expect("write fail");

    let passing = ctk(dir.path(), &["summary", "test_a.testpass"]);
    assert_eq!(passing.status.code(), Some(0));
    assert!(stdout(&passing).contains("TOTAL TESTS: 1 TOTAL FAILURES: 0 IGNORED: 0"));

    let failing = ctk(dir.path(), &["summary", "test_a.testpass", "test_b.testfail"]);
    assert_eq!(failing.status.code(), Some(1));
    assert!(stdout(&failing).contains(r"test\test_b.c:9:test_B:: FAIL"));
}

#[test]
fn junit_writes_requested_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("test_a.testpass"),
        "test/test_a.c:4:test_A:PASS\n-----------------------\n1 Tests 0 Failures 0 Ignored\nOK\n",
    )
    .expect("write pass");

    let output = ctk(dir.path(), &["junit", "test_a.testpass", "--output", "junit.xml"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Wrote junit.xml (1 tests, 0 failures)\n");
    let xml = fs::read_to_string(dir.path().join("junit.xml")).expect("xml written");
    assert!(xml.contains("<testcase name=\"test_A\" classname=\"test_a\"/>"));
}

#[test]
fn colour_never_leaves_text_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("build.log"), "Compiling a.c\ntest_a.c:4:test_A:PASS\n").expect("write log");

    let plain = ctk(dir.path(), &["colour", "build.log", "--color", "never"]);
    assert_eq!(stdout(&plain), "Compiling a.c\ntest_a.c:4:test_A:PASS\n");

    let coloured = ctk(dir.path(), &["colour", "build.log", "--color", "always"]);
    assert_eq!(
        stdout(&coloured),
        "\u{1b}[37mCompiling a.c\u{1b}[0m\n\u{1b}[32mtest_a.c:4:test_A:PASS\u{1b}[0m\n"
    );
}
