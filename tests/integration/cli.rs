use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn beatscan(args: &[&str], extra: &[&Path]) -> Output {
    let binary = env!("CARGO_BIN_EXE_beatscan");
    Command::new(binary)
        .args(args)
        .args(extra)
        .output()
        .expect("run beatscan")
}

#[test]
fn scan_prints_one_line_per_matching_beat() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let patterns = tmp.path().join("patterns.txt");
    let input = tmp.path().join("input.bin");
    fs::write(&patterns, b"cat\ndog\n").expect("write patterns");
    fs::write(&input, b"xcatdogx").expect("write input");

    let pat_flag = format!("--patterns={}", patterns.display());
    let output = beatscan(
        &["scan", &pat_flag, "--partitions=1", "--beat-width=4"],
        &[&input],
    );
    assert!(
        output.status.success(),
        "scan failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "beat=0 id=1 pattern=cat\nbeat=1 id=2 pattern=dog\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("beats=2 bytes=8 matches=2 patterns=2 partitions=1"),
        "unexpected stats line: {stderr}"
    );
}

#[test]
fn scan_all_partitions_reports_end_offsets() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let patterns = tmp.path().join("patterns.txt");
    let input = tmp.path().join("input.bin");
    fs::write(&patterns, b"cat\ndog\n").expect("write patterns");
    fs::write(&input, b"xcatdogx").expect("write input");

    let pat_flag = format!("--patterns={}", patterns.display());
    let output = beatscan(
        &["scan", &pat_flag, "--partitions=1", "--all-partitions"],
        &[&input],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "beat=0 id=1 end=3 pattern=cat\nbeat=1 id=2 end=6 pattern=dog\n"
    );
}

#[test]
fn pack_writes_id_map_and_table() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let patterns = tmp.path().join("patterns.txt");
    let map = tmp.path().join("ids.map");
    fs::write(&patterns, b"dog\ncat\ndog\n").expect("write patterns");

    let output = beatscan(&["pack", "--partitions=1"], &[&patterns, &map]);
    assert!(
        output.status.success(),
        "pack failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read(&map).expect("read map"), b"dog 1\ncat 2\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("short"), "missing allocation summary: {stderr}");
    assert!(stderr.contains("patterns=2 partitions=1"), "missing totals: {stderr}");
}

#[test]
fn usage_errors_exit_with_two() {
    assert_eq!(beatscan(&[], &[]).status.code(), Some(2));
    assert_eq!(beatscan(&["frobnicate"], &[]).status.code(), Some(2));
    assert_eq!(beatscan(&["scan", "--bogus"], &[]).status.code(), Some(2));
    assert_eq!(beatscan(&["scan", "--beat-width=0"], &[]).status.code(), Some(2));
    assert_eq!(beatscan(&["pack", "only-one-path"], &[]).status.code(), Some(2));
}

#[test]
fn missing_pattern_file_exits_with_one() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let input = tmp.path().join("input.bin");
    fs::write(&input, b"abc").expect("write input");
    let missing = tmp.path().join("nope.txt");
    let pat_flag = format!("--patterns={}", missing.display());

    let output = beatscan(&["scan", &pat_flag], &[&input]);
    assert_eq!(output.status.code(), Some(1));
}
