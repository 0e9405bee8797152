use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp dir holding `a.js` ("a") and `test.css` ("test"), whose MD5
/// fingerprints are `0cc175b9c0` and `098f6bcd46`.
pub fn create_test_assets() -> TempDir {
    let dir = TempDir::new().unwrap();

    write_asset(dir.path(), "a.js", "a");
    write_asset(dir.path(), "test.css", "test");

    dir
}

pub fn write_asset(dir: impl AsRef<Path>, name: &str, content: &str) -> PathBuf {
    let path = dir.as_ref().join(name);
    fs::write(&path, content).unwrap();
    path
}
