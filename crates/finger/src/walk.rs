use anyhow::Context;
use finger_core::{BatchCompiler, DestinationPolicy};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Feeds the batch compiler one directory level at a time.
pub struct Walker<'a> {
    compiler: &'a BatchCompiler,
    recursive: bool,
}

impl<'a> Walker<'a> {
    pub fn new(compiler: &'a BatchCompiler, recursive: bool) -> Self {
        Self {
            compiler,
            recursive,
        }
    }

    /// Fingerprint a file or directory; returns the written paths.
    pub fn compile_source(
        &self,
        source: &Path,
        destination: &DestinationPolicy,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let source = std::path::absolute(source)
            .with_context(|| format!("failed to resolve {}", source.display()))?;
        let metadata = std::fs::metadata(&source)
            .with_context(|| format!("failed to stat {}", source.display()))?;

        if metadata.is_dir() {
            self.compile_dir(&source, destination)
        } else {
            Ok(self.compiler.compile_and_write(&[source], destination)?)
        }
    }

    /// One batch for the files directly inside `dir`, then each subdirectory
    /// in name order when recursing, with the destination mirrored.
    pub fn compile_dir(
        &self,
        dir: &Path,
        destination: &DestinationPolicy,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let (files, subdirs) = list_level(dir)?;
        debug!(
            dir = %dir.display(),
            files = files.len(),
            subdirs = subdirs.len(),
            "compiling directory"
        );

        let mut written = self.compiler.compile_and_write(&files, destination)?;

        if self.recursive {
            for subdir in subdirs {
                let name = subdir.file_name().unwrap_or_default().to_owned();
                written.extend(self.compile_dir(&subdir, &destination.join(name))?);
            }
        }

        Ok(written)
    }
}

/// Entries directly under `dir`, sorted by name, split into non-directories
/// and directories.
fn list_level(dir: &Path) -> anyhow::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to read directory {}", dir.display()))?;
        if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    Ok((files, subdirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "a").unwrap();
        fs::create_dir_all(dir.path().join("css/print")).unwrap();
        fs::write(dir.path().join("css/test.css"), "test").unwrap();
        fs::write(dir.path().join("css/print/a.css"), "a").unwrap();
        dir
    }

    #[test]
    fn single_file_source() {
        let site = create_site();
        let compiler = BatchCompiler::default();

        let written = Walker::new(&compiler, false)
            .compile_source(&site.path().join("a.js"), &DestinationPolicy::Colocate)
            .unwrap();

        assert_eq!(written, vec![site.path().join("a-0cc175b9c0.js")]);
    }

    #[test]
    fn flat_walk_skips_subdirectories() {
        let site = create_site();
        let out = TempDir::new().unwrap();
        let compiler = BatchCompiler::default();

        let written = Walker::new(&compiler, false)
            .compile_source(site.path(), &DestinationPolicy::from_dir(out.path()))
            .unwrap();

        assert_eq!(written, vec![out.path().join("a-0cc175b9c0.js")]);
        assert!(!out.path().join("css").exists());
    }

    #[test]
    fn recursive_walk_mirrors_tree() {
        let site = create_site();
        let out = TempDir::new().unwrap();
        let compiler = BatchCompiler::default();

        let written = Walker::new(&compiler, true)
            .compile_source(site.path(), &DestinationPolicy::from_dir(out.path()))
            .unwrap();

        assert_eq!(
            written,
            vec![
                out.path().join("a-0cc175b9c0.js"),
                out.path().join("css/test-098f6bcd46.css"),
                out.path().join("css/print/a-0cc175b9c0.css"),
            ]
        );
        assert!(written.iter().all(|p| p.is_file()));
    }

    #[test]
    fn recursive_colocated_walk_stays_beside_sources() {
        let site = create_site();
        let compiler = BatchCompiler::default();

        Walker::new(&compiler, true)
            .compile_source(site.path(), &DestinationPolicy::Colocate)
            .unwrap();

        assert!(site.path().join("css/test-098f6bcd46.css").is_file());
        assert!(site.path().join("css/print/a-0cc175b9c0.css").is_file());
    }

    #[test]
    fn missing_source_is_an_error() {
        let site = create_site();
        let compiler = BatchCompiler::default();

        let err = Walker::new(&compiler, false)
            .compile_source(&site.path().join("nope"), &DestinationPolicy::Colocate)
            .unwrap_err();

        assert!(err.to_string().contains("nope"));
    }
}
