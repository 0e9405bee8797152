use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn finger(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_finger"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("FINGER_CONFIG")
        .args(args)
        .output()
        .unwrap()
}

fn create_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("static/css")).unwrap();
    fs::write(dir.path().join("static/a.js"), "a").unwrap();
    fs::write(dir.path().join("static/css/test.css"), "test").unwrap();
    dir
}

#[test]
fn no_arguments_prints_usage_and_succeeds() {
    let site = create_site();

    let output = finger(site.path(), &[]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn single_file_is_fingerprinted_silently() {
    let site = create_site();

    let output = finger(site.path(), &["static/a.js"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
    assert_eq!(
        fs::read(site.path().join("static/a-0cc175b9c0.js")).unwrap(),
        b"a"
    );
}

#[test]
fn recursive_with_output_dir() {
    let site = create_site();

    let output = finger(site.path(), &["-r", "static", "-o", "dist"]);

    assert!(output.status.success());
    assert!(site.path().join("dist/a-0cc175b9c0.js").is_file());
    assert!(site.path().join("dist/css/test-098f6bcd46.css").is_file());
}

#[test]
fn without_recursion_subdirectories_are_skipped() {
    let site = create_site();

    let output = finger(site.path(), &["static", "-o", "dist"]);

    assert!(output.status.success());
    assert!(site.path().join("dist/a-0cc175b9c0.js").is_file());
    assert!(!site.path().join("dist/css").exists());
}

#[test]
fn config_file_in_cwd_is_used() {
    let site = create_site();
    fs::write(
        site.path().join("finger.json"),
        r#"{ "recursive": true, "dest_dir": "out", "length": 6 }"#,
    )
    .unwrap();

    let output = finger(site.path(), &["static"]);

    assert!(output.status.success());
    assert!(site.path().join("out/a-0cc175.js").is_file());
    assert!(site.path().join("out/css/test-098f6b.css").is_file());
}

#[test]
fn missing_source_reports_path_and_fails() {
    let site = create_site();

    let output = finger(site.path(), &["static/missing.js"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("finger: "));
    assert!(stderr.contains("missing.js"));
}

#[test]
fn invalid_length_fails() {
    let site = create_site();

    let output = finger(site.path(), &["-l", "0", "static/a.js"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("fingerprint length"));
    assert!(!site.path().join("static/a-.js").exists());
}

#[test]
fn os_error_is_reported_once() {
    let site = create_site();
    fs::write(site.path().join("blocker"), "not a dir").unwrap();

    let output = finger(site.path(), &["static/a.js", "-o", "blocker"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to create directory blocker"));
    assert_eq!(stderr.matches("os error").count(), 1);
}

#[test]
fn no_recursive_flag_overrides_config() {
    let site = create_site();
    fs::write(
        site.path().join("finger.json"),
        r#"{ "recursive": true, "parallel": true, "dest_dir": "out" }"#,
    )
    .unwrap();

    let output = finger(site.path(), &["--no-recursive", "--no-parallel", "static"]);

    assert!(output.status.success());
    assert!(site.path().join("out/a-0cc175b9c0.js").is_file());
    assert!(!site.path().join("out/css").exists());
}
