use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FingerprintError, Result};
use crate::fingerprint::{ContentHasher, Fingerprinter, HashAlgorithm};

/// Where fingerprinted copies are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Next to the source file.
    #[default]
    Colocate,
    Directory(PathBuf),
}

impl DestinationPolicy {
    /// An empty path means [`DestinationPolicy::Colocate`].
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            Self::Colocate
        } else {
            Self::Directory(dir)
        }
    }

    /// Policy for a subdirectory `name` when mirroring a source tree.
    pub fn join(&self, name: impl AsRef<Path>) -> Self {
        match self {
            Self::Colocate => Self::Colocate,
            Self::Directory(dir) => Self::Directory(dir.join(name)),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::Colocate => None,
            Self::Directory(dir) => Some(dir),
        }
    }
}

impl From<Option<PathBuf>> for DestinationPolicy {
    fn from(dir: Option<PathBuf>) -> Self {
        dir.map(Self::from_dir).unwrap_or_default()
    }
}

#[derive(Debug)]
struct Compiled {
    digest: String,
    content: Vec<u8>,
}

/// A source file awaiting, or having gone through, fingerprinting.
///
/// The content is read and hashed at most once, on the first request for the
/// fingerprinted name or path.
#[derive(Debug)]
pub struct FingerprintedFile<'a, H = HashAlgorithm> {
    source: File,
    source_path: PathBuf,
    destination: DestinationPolicy,
    fingerprinter: &'a Fingerprinter<H>,
    compiled: Option<Compiled>,
}

impl<'a, H: ContentHasher> FingerprintedFile<'a, H> {
    pub fn open(
        path: impl Into<PathBuf>,
        destination: DestinationPolicy,
        fingerprinter: &'a Fingerprinter<H>,
    ) -> Result<Self> {
        let path = path.into();
        match File::open(&path) {
            Ok(file) => Ok(Self::from_file(file, path, destination, fingerprinter)),
            Err(source) => Err(FingerprintError::Open { path, source }),
        }
    }

    pub fn from_file(
        source: File,
        source_path: impl Into<PathBuf>,
        destination: DestinationPolicy,
        fingerprinter: &'a Fingerprinter<H>,
    ) -> Self {
        Self {
            source,
            source_path: source_path.into(),
            destination,
            fingerprinter,
            compiled: None,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The digest, if it has been computed yet.
    pub fn fingerprint(&self) -> Option<&str> {
        self.compiled.as_ref().map(|c| c.digest.as_str())
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.compiled.as_ref().map(|c| c.content.as_slice())
    }

    /// Read and hash the source unless that already happened; returns the digest.
    pub fn ensure_compiled(&mut self) -> Result<&str> {
        Ok(self.compiled()?.digest.as_str())
    }

    pub fn fingerprinted_name(&mut self) -> Result<OsString> {
        let digest = self.ensure_compiled()?.to_owned();
        Ok(fingerprinted_file_name(&self.source_path, &digest))
    }

    pub fn fingerprinted_dir(&self) -> &Path {
        match &self.destination {
            DestinationPolicy::Directory(dir) => dir,
            DestinationPolicy::Colocate => self.source_path.parent().unwrap_or(Path::new("")),
        }
    }

    pub fn fingerprinted_path(&mut self) -> Result<PathBuf> {
        let name = self.fingerprinted_name()?;
        Ok(self.fingerprinted_dir().join(name))
    }

    /// Permission bits of the open source handle.
    pub fn source_permissions(&self) -> Result<Permissions> {
        self.source
            .metadata()
            .map(|meta| meta.permissions())
            .map_err(|source| FingerprintError::Stat {
                path: self.source_path.clone(),
                source,
            })
    }

    /// Write the content to its fingerprinted path with the source's
    /// permissions, creating the directory if needed.
    pub fn write(mut self) -> Result<PathBuf> {
        let permissions = self.source_permissions()?;
        prepare_dir(self.fingerprinted_dir())?;

        let path = self.fingerprinted_path()?;
        let compiled = self.compiled()?;
        write_content(&path, &compiled.content, permissions).map_err(|source| {
            FingerprintError::Write {
                path: path.clone(),
                source,
            }
        })?;

        debug!(
            source = %self.source_path.display(),
            target = %path.display(),
            "wrote fingerprinted file"
        );
        Ok(path)
    }

    fn compiled(&mut self) -> Result<&Compiled> {
        let compiled = match self.compiled.take() {
            Some(compiled) => compiled,
            None => self.read_and_hash()?,
        };
        Ok(&*self.compiled.insert(compiled))
    }

    fn read_and_hash(&mut self) -> Result<Compiled> {
        let mut content = Vec::new();
        self.source
            .read_to_end(&mut content)
            .map_err(|source| FingerprintError::Read {
                path: self.source_path.clone(),
                source,
            })?;
        let digest = self.fingerprinter.compile_digest(&content);
        Ok(Compiled { digest, content })
    }
}

/// File name without its trailing extension.
///
/// A leading dot does not start an extension, so `.gitignore` is all stem.
pub fn file_stem(path: &Path) -> &OsStr {
    path.file_stem().unwrap_or_default()
}

/// `<stem>-<digest><ext>` for the final segment of `path`.
pub fn fingerprinted_file_name(path: &Path, digest: &str) -> OsString {
    let mut name = file_stem(path).to_os_string();
    name.push("-");
    name.push(digest);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn prepare_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::DirBuilder::new()
        .recursive(true)
        .create(dir)
        .map_err(|source| FingerprintError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// A read-only output left by an earlier run is replaced rather than truncated.
fn write_content(path: &Path, content: &[u8], permissions: Permissions) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() && meta.permissions().readonly() => fs::remove_file(path)?,
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(permissions.mode());
    }

    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.set_permissions(permissions)
}
