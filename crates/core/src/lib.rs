//! Content fingerprinting for static assets.
//!
//! Copies `style.css` to `style-<digest>.css`, where the digest is a short hex
//! hash of the file content, so that deployed assets can be cached forever.

pub mod batch;
pub mod error;
pub mod file;
pub mod fingerprint;
#[cfg(test)]
mod testutils;

pub use batch::{compile_and_write, BatchCompiler};
pub use error::{FingerprintError, Result};
pub use file::{file_stem, fingerprinted_file_name, DestinationPolicy, FingerprintedFile};
pub use fingerprint::{
    compile_digest, ContentHasher, Fingerprinter, HashAlgorithm, DEFAULT_LENGTH,
};
