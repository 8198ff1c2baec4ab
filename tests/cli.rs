extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn cmd() -> Command {
    Command::cargo_bin("newtonloop").unwrap()
}

#[test]
fn renders_and_mirrors_a_small_loop() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(&["--size", "8x8", "--frames", "6", "--quality", "test"])
        .args(&["--noise-size", "16", "--threads", "1"])
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Rendering 6 frames at res 8 x 8"));

    let frames = dir.path().join("frames");
    for frame in 0..6 {
        assert!(frames.join(format!("frame{:04}.png", frame)).exists());
    }
    assert_eq!(
        fs::read(frames.join("frame0002.png")).unwrap(),
        fs::read(frames.join("frame0004.png")).unwrap()
    );

    let times = fs::read_to_string(dir.path().join("frame_times.csv")).unwrap();
    assert_eq!(times.lines().count(), 4);
    let stats = fs::read_to_string(dir.path().join("benchmark_stats.txt")).unwrap();
    assert_eq!(stats.lines().count(), 2);
}

#[test]
fn no_save_only_writes_timings() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(&["--size", "4x4", "--frames", "2", "--quality", "test", "--no-save"])
        .args(&["--noise-size", "4", "--threads", "1"])
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("frames").join("frame0000.png").exists());
    assert!(dir.path().join("frame_times.csv").exists());
}

#[test]
fn rejects_a_noise_size_that_is_not_a_power_of_two() {
    cmd()
        .args(&["--noise-size", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("power of two"));
}

#[test]
fn rejects_a_malformed_size() {
    cmd()
        .args(&["--size", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_an_empty_frame() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(&["--size", "0x8", "--threads", "1"])
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure: invalid configuration"));
}
