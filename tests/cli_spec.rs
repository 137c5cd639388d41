mod common;

use common::{map_lines, scratch_dir, write_file};
use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_charmap-compiler"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run compiler: {}", e))
}

#[test]
fn failed_build_exits_with_status_one_and_writes_nothing() {
    let dir = scratch_dir();
    let out = dir.path().join("out.txt");
    let src = dir.path().to_string_lossy().into_owned();

    let output = run(&["sbcs", &src, "missing", &out.to_string_lossy()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists(), "no output file after a failed build");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to compile missing"), "stderr: {}", stderr);
    assert!(stderr.contains("missing.map"), "stderr: {}", stderr);
}

#[test]
fn unknown_shape_exits_with_status_one() {
    let dir = scratch_dir();
    let out = dir.path().join("out.txt");
    let output = run(&["ebcdic", &dir.path().to_string_lossy(), "x", &out.to_string_lossy()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn successful_build_writes_the_artifact() {
    let dir = scratch_dir();
    write_file(dir.path(), "ok.map", &map_lines(&[(0x41, 0x41), (0x80, 0x20AC)]));
    let out = dir.path().join("out.txt");

    let output = run(&["sbcs", &dir.path().to_string_lossy(), "ok", &out.to_string_lossy()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = fs::read_to_string(&out).expect("output file");
    assert!(written.contains("// $B2C_TABLE$"));
    assert!(written.contains("\\u20AC"));
}
