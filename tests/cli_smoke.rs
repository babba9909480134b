//! The `art1` binary end to end: arguments in, report files out.
//!
//! Tests are run with `cargo test --features cli`.

#![cfg(feature = "cli")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ─── helpers ─────────────────────────────────────────────────────────────────

const TRAIN: &str = "\
cross, 0,1,0, 1,1,1, 0,1,0
cross, 0,1,0, 1,1,1, 0,1,0
ring,  1,1,1, 1,0,1, 1,1,1
ring,  1,1,1, 1,0,1, 1,1,1
blank, 0,0,0, 0,0,0, 0,0,0
";

const TEST: &str = "\
cross, 0,1,0, 1,1,1, 0,1,0
ring,  1,1,1, 1,0,1, 1,1,1
";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("art1-cli-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn art1(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_art1"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn path_arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn labelled_run_writes_every_output_file() {
    let dir = scratch_dir("run");
    let train = dir.join("train.csv");
    let test = dir.join("test.csv");
    fs::write(&train, TRAIN).unwrap();
    fs::write(&test, TEST).unwrap();
    let out_dir = dir.join("out");

    let out = art1(&[
        "--train", path_arg(&train),
        "--test", path_arg(&test),
        "--labelled",
        "--vigilance", "0.8",
        "--beta", "0.5",
        "--seed", "1",
        "--json",
        "--out-dir", path_arg(&out_dir),
        "--prefix", "smoke",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("clusters, best fluctuation"), "{stdout}");

    let train_report = fs::read_to_string(out_dir.join("smoke_train.txt")).unwrap();
    assert!(train_report.contains("number of empty patterns (ignored): 1"));
    assert!(out_dir.join("smoke_test.txt").is_file());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("smoke_summary.json")).unwrap())
            .unwrap();
    let clusters = summary["clusters"].as_u64().unwrap() as usize;
    assert!(clusters >= 1);
    assert_eq!(summary["prototypes"].as_array().unwrap().len(), clusters);
    let tally = &summary["test_tally"];
    assert_eq!(tally["success"].as_u64().unwrap() + tally["fail"].as_u64().unwrap(), 2);

    let cluster_files = fs::read_dir(&out_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with("smoke_clust_") && name.ends_with(".csv")
        })
        .count();
    assert_eq!(cluster_files, clusters);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_set_without_labels_is_refused() {
    let dir = scratch_dir("unlabelled");
    let train = dir.join("train.csv");
    fs::write(&train, "1,1,0,0\n0,0,1,1\n").unwrap();

    let out = art1(&[
        "--train", path_arg(&train),
        "--test", path_arg(&train),
        "--out-dir", path_arg(&dir),
        "--seed", "1",
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--labelled"), "{stderr}");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_vigilance_fails_before_reading_data() {
    let out = art1(&["--train", "/definitely/not/here.csv", "--vigilance", "1.5"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.to_lowercase().contains("vigilance"), "{stderr}");
}
