//! End-to-end tests of the `cephalopod` binary's stdin/stdout contract.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cephalopod"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn cephalopod");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for cephalopod")
}

#[test]
fn test_prints_single_result_line() {
    let out = run(&[], "20\n0 6 0\n2 2 2\n1 6 1\n");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "322444322\n");
}

#[test]
fn test_every_engine_agrees() {
    for engine in ["memo", "layered", "reference"] {
        let out = run(&["--engine", engine], "1\n0 0 0\n0 0 0\n0 0 0\n");
        assert!(out.status.success(), "engine {}", engine);
        assert_eq!(String::from_utf8_lossy(&out.stdout), "111111111\n", "engine {}", engine);
    }
}

#[test]
fn test_table_bits_override() {
    let out = run(&["--table-bits", "3"], "6 0 0 0 0 0 0 0 0 0");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "680243700\n");
}

#[test]
fn test_stats_stay_off_stdout() {
    let out = run(&["--stats"], "4 2 0 2 0 0 0 2 0 2");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "901927116\n");
    assert!(String::from_utf8_lossy(&out.stderr).contains("Nodes visited"));
}

#[test]
fn test_malformed_input_fails() {
    let out = run(&[], "3\n1 2 3\n");
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("expected 9 cell values"));
}
