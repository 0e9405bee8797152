use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FingerprintError, Result};

/// Number of hex characters kept from the digest by default.
pub const DEFAULT_LENGTH: usize = 10;

/// Hash strategy used by a [`Fingerprinter`].
pub trait ContentHasher: Send + Sync {
    /// Lowercase hex digest of the full content.
    fn hex_digest(&self, content: &[u8]) -> String;

    /// Length of the untruncated hex digest.
    fn hex_len(&self) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Blake3 => "blake3",
        }
    }
}

impl ContentHasher for HashAlgorithm {
    fn hex_digest(&self, content: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(content)),
            Self::Blake3 => blake3::hash(content).to_hex().to_string(),
        }
    }

    fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Blake3 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!("unknown hash algorithm: {other} (expected md5 or blake3)")),
        }
    }
}

/// Turns content into a short, deterministic hex fingerprint.
#[derive(Debug, Clone)]
pub struct Fingerprinter<H = HashAlgorithm> {
    hasher: H,
    length: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl<H: ContentHasher> Fingerprinter<H> {
    pub fn new(hasher: H) -> Self {
        let length = DEFAULT_LENGTH.min(hasher.hex_len());
        Self { hasher, length }
    }

    /// Override the number of hex characters kept. Must lie in `1..=hex_len`.
    pub fn with_length(mut self, length: usize) -> Result<Self> {
        let max = self.hasher.hex_len();
        if length == 0 || length > max {
            return Err(FingerprintError::InvalidLength { length, max });
        }
        self.length = length;
        Ok(self)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn compile_digest(&self, content: &[u8]) -> String {
        let mut digest = self.hasher.hex_digest(content);
        digest.truncate(self.length);
        digest
    }
}

/// Fingerprint `content` with MD5, keeping the first [`DEFAULT_LENGTH`] hex chars.
pub fn compile_digest(content: &[u8]) -> String {
    Fingerprinter::default().compile_digest(content)
}
