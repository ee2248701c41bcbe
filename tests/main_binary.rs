//! Integration tests for the `mapslice` binary (src/main.rs).
//!
//! Disabled under Miri and WASI, which cannot spawn the compiled binary.
#![cfg(all(not(miri), not(target_os = "wasi")))]

use std::io::Write;
use std::process::Command;

/// Run the binary with the given args and return (stdout, stderr, exit_code).
fn run_binary(args: &[&str]) -> (String, String, i32) {
    let bin = env!("CARGO_BIN_EXE_mapslice");
    let output = Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    tmp.write_all(content.as_bytes()).unwrap();
    tmp
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    for flag in ["--help", "-h"] {
        let (stdout, _stderr, code) = run_binary(&[flag]);
        assert_eq!(code, 0);
        assert!(stdout.contains("Usage:"), "stdout: {stdout}");
    }
}

#[test]
fn no_args_prints_usage_to_stderr_and_exits_one() {
    let (_stdout, stderr, code) = run_binary(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Usage:"), "stderr: {stderr}");
}

#[test]
fn unknown_option_prints_error_and_exits_one() {
    let (_stdout, stderr, code) = run_binary(&["--bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"), "stderr: {stderr}");
}

#[test]
fn extra_argument_prints_error_and_exits_one() {
    let (_stdout, stderr, code) = run_binary(&["file1.yaml", "file2.yaml"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unexpected extra argument"), "stderr: {stderr}");
}

#[test]
fn missing_file_prints_error_and_exits_two() {
    let (_stdout, stderr, code) = run_binary(&["nonexistent_file_12345.yaml"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}

#[test]
fn yaml_file_is_printed_as_ordered_json() {
    let tmp = temp_file(".yaml", "b: 1\na: [x, true]\n");
    let path = tmp.path().to_str().unwrap();

    let (stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "{\"b\":1,\"a\":[\"x\",true]}\n");
}

#[test]
fn pretty_flag_indents_json() {
    let tmp = temp_file(".yml", "a: 1\n");
    let path = tmp.path().to_str().unwrap();

    let (stdout, stderr, code) = run_binary(&["--pretty", path]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "{\n  \"a\": 1\n}\n");
}

#[test]
fn json_file_is_printed_as_yaml() {
    let tmp = temp_file(".json", r#"{"z": {"k": "v"}, "a": [1, 2.5]}"#);
    let path = tmp.path().to_str().unwrap();

    let (stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "z:\n  k: v\na:\n  - 1\n  - 2.5\n");
}

#[test]
fn invalid_yaml_file_exits_three() {
    // Mapping values are not allowed here.
    let tmp = temp_file(".yaml", "a: b: c:\n");
    let path = tmp.path().to_str().unwrap();

    let (_stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 3, "stderr: {stderr}");
    assert!(stderr.contains("invalid"), "stderr: {stderr}");
}

#[test]
fn non_object_yaml_exits_three() {
    let tmp = temp_file(".yaml", "- just\n- a list\n");
    let path = tmp.path().to_str().unwrap();

    let (_stdout, stderr, code) = run_binary(&[path]);
    assert_eq!(code, 3, "stderr: {stderr}");
    assert!(stderr.contains("only YAML documents that are objects"), "stderr: {stderr}");
}
