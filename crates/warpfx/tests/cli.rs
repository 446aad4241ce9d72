use std::fs;
use std::path::Path;
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

const VALID_CONFIG: &str = r#"
version = 1

[window]
width = 800
height = 300

[simulation]
step_hz = 120

[[panels]]
effect = "ripple"
image = "photos/a.png"

[[panels]]
effect = "glitch"
image = "https://example.com/b.jpg"
seed = 7
"#;

fn warpfx(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_warpfx"));
    command
        .env("WARPFX_CONFIG_DIR", config_dir)
        .env_remove("WARPFX_CONFIG")
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn validate_prints_resolved_panels() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("panels.toml");
    fs::write(&path, VALID_CONFIG).unwrap();

    let output = warpfx(root.path())
        .args(["validate"])
        .arg(&path)
        .output()
        .expect("failed to run warpfx validate");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration OK"));
    assert!(stdout.contains("ripple"));
    assert!(stdout.contains("seed=7"));
    assert!(stdout.contains("https://example.com/b.jpg"));
}

#[test]
fn validate_rejects_config_without_panels() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("empty.toml");
    fs::write(&path, "version = 1\n").unwrap();

    let output = warpfx(root.path())
        .args(["validate"])
        .arg(&path)
        .output()
        .expect("failed to run warpfx validate");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least one panel"), "stderr: {stderr}");
}

#[test]
fn validate_without_file_uses_built_in_demo() {
    let root = TempDir::new().unwrap();

    let output = warpfx(root.path())
        .arg("validate")
        .output()
        .expect("failed to run warpfx validate");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("built-in demo"));
    assert!(stdout.contains("wavy"));
}

#[test]
fn validate_reads_discovered_config_file() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("warpfx.toml"), VALID_CONFIG).unwrap();

    let output = warpfx(root.path())
        .arg("validate")
        .output()
        .expect("failed to run warpfx validate");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("warpfx.toml"));
    assert!(stdout.contains("800x300"));
}

#[test]
fn export_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("source.png");
    RgbaImage::from_fn(40, 30, |x, y| Rgba([(x * 6) as u8, (y * 8) as u8, 90, 255]))
        .save(&source)
        .unwrap();
    let out = root.path().join("frame.png");

    let status = warpfx(root.path())
        .args(["export", "--effect", "wavy", "--steps", "20", "--hover", "--size", "24x12"])
        .arg("--image")
        .arg(&source)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("failed to run warpfx export");

    assert!(status.success());
    let frame = image::open(&out).expect("exported frame should decode");
    assert_eq!((frame.width(), frame.height()), (24, 12));
}

#[test]
fn export_reports_missing_image() {
    let root = TempDir::new().unwrap();
    let output = warpfx(root.path())
        .args(["export", "--effect", "ripple", "--image"])
        .arg(root.path().join("missing.png"))
        .arg("--out")
        .arg(root.path().join("frame.png"))
        .output()
        .expect("failed to run warpfx export");

    assert!(!output.status.success());
    assert!(!root.path().join("frame.png").exists());
}

#[test]
fn paths_reports_override_directory() {
    let root = TempDir::new().unwrap();
    let output = warpfx(root.path())
        .arg("paths")
        .output()
        .expect("failed to run warpfx paths");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&root.path().display().to_string()));
    assert!(stdout.contains("missing"));
}
