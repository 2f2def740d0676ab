//! CLI end-to-end tests
//!
//! Tests for the tagforged command-line interface against small MP4 files
//! built in a temp directory.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tagforged_bmff::bmff::{fullbox_header, write_box, write_container_box, AtomType};
use tempfile::{tempdir, TempDir};

/// Get a command for the tagforged binary
#[allow(deprecated)]
fn tagforged_cmd() -> Command {
    Command::cargo_bin("tagforged").unwrap()
}

/// ftyp + moov(mvhd, udta/meta) + mdat
fn minimal_mp4(with_udta: bool) -> Vec<u8> {
    let mut mvhd = vec![0u8; 96];
    mvhd[..4].copy_from_slice(&fullbox_header(0, 0));
    mvhd[92..].copy_from_slice(&1u32.to_be_bytes());
    let mvhd = write_box(AtomType::MVHD, &mvhd);

    let meta = write_box(AtomType::META, &fullbox_header(0, 0));
    let udta = write_container_box(AtomType::UDTA, &[&meta]);
    let moov = if with_udta {
        write_container_box(AtomType::MOOV, &[&mvhd, &udta])
    } else {
        write_container_box(AtomType::MOOV, &[&mvhd])
    };

    let mut out = write_box(AtomType::FTYP, b"isom\0\0\0\0isom");
    out.extend(moov);
    out.extend(write_box(AtomType::MDAT, &[0; 8]));
    out
}

fn setup(name: &str, with_udta: bool) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, minimal_mp4(with_udta)).unwrap();
    (dir, path)
}

fn write_srt(dir: &Path) -> PathBuf {
    let path = dir.join("captions.srt");
    fs::write(
        &path,
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n",
    )
    .unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = tagforged_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = tagforged_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagforged"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = tagforged_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_tag_then_show() {
    let (_dir, path) = setup("movie.mp4", true);

    tagforged_cmd()
        .args(["tag", path.to_str().unwrap(), "--title", "Elephants Dream"])
        .args(["--artist", "Orange"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 tag(s)"));

    tagforged_cmd()
        .args(["show", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("title"))
        .stdout(predicate::str::contains("Elephants Dream"));
}

#[test]
fn test_cli_show_json() {
    let (_dir, path) = setup("movie.mp4", true);
    tagforged_cmd()
        .args(["tag", path.to_str().unwrap(), "--genre", "Short"])
        .assert()
        .success();

    let output = tagforged_cmd()
        .args(["show", path.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["genre"], "Short");
}

#[test]
fn test_cli_tag_without_udta_is_skipped() {
    let (_dir, path) = setup("movie.mp4", false);
    let before = fs::read(&path).unwrap();

    tagforged_cmd()
        .args(["tag", path.to_str().unwrap(), "--title", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_cli_tag_requires_a_value() {
    let (_dir, path) = setup("movie.mp4", true);
    tagforged_cmd()
        .args(["tag", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to write"));
}

#[test]
fn test_cli_brand_from_extension() {
    let (_dir, path) = setup("song.m4a", true);
    tagforged_cmd()
        .args(["brand", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("audio"));

    let data = fs::read(&path).unwrap();
    assert_eq!(&data[4..12], b"ftypM4A ");
}

#[test]
fn test_cli_brand_explicit_profile() {
    let (_dir, path) = setup("movie.mp4", true);
    tagforged_cmd()
        .args(["brand", path.to_str().unwrap(), "--profile", "video"])
        .assert()
        .success();
    assert_eq!(&fs::read(&path).unwrap()[4..12], b"ftypM4V ");
}

#[test]
fn test_cli_brand_invalid_profile() {
    let (_dir, path) = setup("movie.mp4", true);
    tagforged_cmd()
        .args(["brand", path.to_str().unwrap(), "--profile", "flac"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output profile"));
}

#[test]
fn test_cli_subtitle() {
    let (dir, path) = setup("movie.m4v", true);
    let srt = write_srt(dir.path());
    let len_before = fs::metadata(&path).unwrap().len();

    tagforged_cmd()
        .args(["subtitle", path.to_str().unwrap(), srt.to_str().unwrap()])
        .args(["--language", "fra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 cue(s)"))
        .stdout(predicate::str::contains("as track 1"));

    let data = fs::read(&path).unwrap();
    assert!(data.len() as u64 > len_before);
    assert!(data.windows(4).any(|w| w == b"tx3g"));
    assert!(data.ends_with(b"\0\x05Hello\0\x05World"));
}

#[test]
fn test_cli_subtitle_uses_config() {
    let (dir, path) = setup("movie.m4v", true);
    let srt = write_srt(dir.path());
    let config = dir.path().join("tagforged.toml");
    fs::write(&config, "[text_track]\ntrack_id = 9\n").unwrap();

    tagforged_cmd()
        .args(["-c", config.to_str().unwrap()])
        .args(["subtitle", path.to_str().unwrap(), srt.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("as track 9"));
}

#[test]
fn test_cli_subtitle_unsupported_format() {
    let (dir, path) = setup("movie.m4v", true);
    let ass = dir.path().join("captions.ass");
    fs::write(&ass, "[Script Info]\n").unwrap();

    tagforged_cmd()
        .args(["subtitle", path.to_str().unwrap(), ass.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported subtitle format"));
}

#[test]
fn test_cli_show_nonexistent_file() {
    tagforged_cmd()
        .args(["show", "/nonexistent/movie.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file unreadable"));
}

#[test]
fn test_cli_validate_default() {
    let dir = tempdir().unwrap();
    tagforged_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"));
}

#[test]
fn test_cli_validate_rejects_bad_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[text_track]\ntimescale = 0\n").unwrap();

    tagforged_cmd()
        .args(["validate", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timescale"));
}
