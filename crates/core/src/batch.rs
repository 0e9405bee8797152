use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::file::{DestinationPolicy, FingerprintedFile};
use crate::fingerprint::{ContentHasher, Fingerprinter, HashAlgorithm};

/// Fingerprints a list of files sharing one destination policy.
#[derive(Debug, Clone)]
pub struct BatchCompiler<H = HashAlgorithm> {
    fingerprinter: Fingerprinter<H>,
    parallel: bool,
}

impl Default for BatchCompiler {
    fn default() -> Self {
        Self::new(Fingerprinter::default())
    }
}

impl<H: ContentHasher> BatchCompiler<H> {
    pub fn new(fingerprinter: Fingerprinter<H>) -> Self {
        Self {
            fingerprinter,
            parallel: false,
        }
    }

    /// Hash and write the files of a batch on the rayon pool.
    ///
    /// The first error in input order is still the one returned, but files
    /// after it may already have been written.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn fingerprinter(&self) -> &Fingerprinter<H> {
        &self.fingerprinter
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Open every path. Fails on the first one that cannot be opened.
    pub fn compile_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        destination: &DestinationPolicy,
    ) -> Result<Vec<FingerprintedFile<'_, H>>> {
        paths
            .iter()
            .map(|path| {
                FingerprintedFile::open(
                    path.as_ref(),
                    destination.clone(),
                    &self.fingerprinter,
                )
            })
            .collect()
    }

    /// Write a fingerprinted copy of every path; returns the written paths in
    /// input order. Nothing is rolled back when a file fails.
    pub fn compile_and_write<P: AsRef<Path>>(
        &self,
        paths: &[P],
        destination: &DestinationPolicy,
    ) -> Result<Vec<PathBuf>> {
        debug!(
            files = paths.len(),
            destination = ?destination,
            parallel = self.parallel,
            "compiling batch"
        );

        let files = self.compile_files(paths, destination)?;

        if self.parallel {
            files
                .into_par_iter()
                .map(FingerprintedFile::write)
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            files.into_iter().map(FingerprintedFile::write).collect()
        }
    }
}

/// [`BatchCompiler::compile_and_write`] with the default MD5 fingerprinter.
pub fn compile_and_write<P: AsRef<Path>>(
    paths: &[P],
    destination: &DestinationPolicy,
) -> Result<Vec<PathBuf>> {
    BatchCompiler::default().compile_and_write(paths, destination)
}
