use assert_cmd::Command;
use predicates::prelude::*;

fn cronbits() -> Command {
    let mut cmd = Command::cargo_bin("cronbits").unwrap();
    cmd.env_remove("CRONBITS_LOG")
        .env("CRONBITS_NOW", "2024-01-06T12:00:00Z");
    cmd
}

// ============================================================
// Default: next occurrences after now
// ============================================================

#[test]
fn test_next_occurrence() {
    cronbits()
        .args(["--tz", "UTC", "0 30 9 * * MON-FRI"])
        .assert()
        .success()
        .stdout("2024-01-08T09:30:00+00:00[UTC]\n");
}

#[test]
fn test_five_field_expression() {
    cronbits()
        .args(["--tz", "UTC", "0 0 * * *"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-07T00:00:00"));
}

#[test]
fn test_multiple_occurrences() {
    cronbits()
        .args(["--tz", "UTC", "-n", "3", "0 0 */6 * * *"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2024-01-06T18:00:00")
                .and(predicate::str::contains("2024-01-07T00:00:00"))
                .and(predicate::str::contains("2024-01-07T06:00:00")),
        );
}

#[test]
fn test_previous_occurrences() {
    cronbits()
        .args(["--tz", "UTC", "--prev", "-n", "2", "0 0 */6 * * *"])
        .assert()
        .success()
        .stdout("2024-01-06T06:00:00+00:00[UTC]\n2024-01-06T00:00:00+00:00[UTC]\n");
}

#[test]
fn test_schedule_zone_is_used() {
    cronbits()
        .args(["--tz", "UTC", "CRON_TZ=Asia/Tokyo 0 0 9 * * *"])
        .assert()
        .success()
        .stdout("2024-01-07T00:00:00+00:00[UTC]\n");
}

#[test]
fn test_json_output() {
    cronbits()
        .args(["--tz", "UTC", "--json", "-n", "2", "@daily"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[\"2024-01-07T00:00:00"));
}

#[test]
fn test_no_upcoming_occurrences() {
    cronbits()
        .args(["--tz", "UTC", "0 0 0 1 1 * 2020"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("no upcoming occurrences"));
}

// ============================================================
// Range queries
// ============================================================

#[test]
fn test_from_to_range() {
    cronbits()
        .args([
            "--from",
            "2024-01-01T00:00:00[UTC]",
            "--to",
            "2024-01-03T00:00:00[UTC]",
            "@daily",
        ])
        .assert()
        .success()
        .stdout("2024-01-02T00:00:00+00:00[UTC]\n2024-01-03T00:00:00+00:00[UTC]\n");
}

#[test]
fn test_from_without_to_is_capped() {
    let output = cronbits()
        .args(["--from", "2024-01-01T00:00:00[UTC]", "@hourly"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 100);
}

#[test]
fn test_from_backward() {
    let output = cronbits()
        .args(["--prev", "--from", "2024-01-01T00:00:00[UTC]", "@yearly"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.first(), Some(&"2023-01-01T00:00:00+00:00[UTC]"));
    assert_eq!(lines.last(), Some(&"1970-01-01T00:00:00+00:00[UTC]"));
}

#[test]
fn test_to_conflicts_with_prev() {
    cronbits()
        .args([
            "--prev",
            "--from",
            "2024-01-01T00:00:00[UTC]",
            "--to",
            "2024-01-03T00:00:00[UTC]",
            "@daily",
        ])
        .assert()
        .failure();
}

#[test]
fn test_invalid_from() {
    cronbits()
        .args(["--from", "yesterday", "@daily"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid --from datetime"));
}

// ============================================================
// Validation and introspection
// ============================================================

#[test]
fn test_check_valid() {
    cronbits()
        .args(["--check", "0 0 9 * * MON-FRI"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_check_invalid() {
    cronbits()
        .args(["--check", "0 75 * * * *"])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("minute value 75 out of range 0-59")
                .and(predicate::str::contains("^^")),
        );
}

#[test]
fn test_suggestion_in_error() {
    cronbits()
        .arg("0 0 9 * * MONDAY")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("try: \"MON\""));
}

#[test]
fn test_parse_json() {
    cronbits()
        .args(["--parse", "CRON_TZ=UTC 0 30 9 * * MON-FRI"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"expression\": \"CRON_TZ=UTC 0 30 9 * * MON-FRI *\"")
                .and(predicate::str::contains("\"timezone\": \"UTC\""))
                .and(predicate::str::contains("\"day-of-week-star\": false")),
        );
}

#[test]
fn test_missing_expression() {
    cronbits()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no expression provided"));
}

#[test]
fn test_unknown_timezone_flag() {
    cronbits()
        .args(["--tz", "Mars/Olympus", "@daily"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid --tz"));
}

// ============================================================
// Environment
// ============================================================

#[test]
fn test_invalid_now() {
    cronbits()
        .env("CRONBITS_NOW", "not a time")
        .args(["--tz", "UTC", "@daily"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CRONBITS_NOW"));
}

#[test]
fn test_invalid_log_level() {
    cronbits()
        .env("CRONBITS_LOG", "loud")
        .arg("@daily")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized log level"));
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    cronbits()
        .env("CRONBITS_LOG", "debug")
        .args(["--tz", "UTC", "@daily"])
        .assert()
        .success()
        .stdout("2024-01-07T00:00:00+00:00[UTC]\n")
        .stderr(predicate::str::contains("DEBUG"));
}
