use finger_core::{BatchCompiler, DestinationPolicy, Fingerprinter, HashAlgorithm, DEFAULT_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "finger.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recursive: bool,
    pub dest_dir: Option<PathBuf>,
    pub algorithm: HashAlgorithm,
    pub length: usize,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: false,
            dest_dir: None,
            algorithm: HashAlgorithm::default(),
            length: DEFAULT_LENGTH,
            parallel: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(Into::into)
    }

    /// Load `path` if given, else `finger.json` in `cwd` if present, else defaults.
    pub fn load_or_default(path: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(Into::into)
    }

    pub fn destination(&self) -> DestinationPolicy {
        self.dest_dir.clone().into()
    }

    /// Build a compiler, rejecting a length the algorithm cannot provide.
    pub fn compiler(&self) -> anyhow::Result<BatchCompiler> {
        let fingerprinter = Fingerprinter::new(self.algorithm).with_length(self.length)?;
        Ok(BatchCompiler::new(fingerprinter).with_parallel(self.parallel))
    }
}
