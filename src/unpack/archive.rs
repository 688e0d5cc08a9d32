use crate::error::{DepackError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The extraction capability: unpack one archive file into a destination
/// directory. The tracker drives this through the trait so tests (and other
/// callers) can substitute their own implementation.
pub trait Unarchiver {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
}

/// Extension-dispatched unarchiver covering the common artifact packagings:
/// zip-based (`.zip`, `.jar`, `.war`) and tar-based (`.tar`, `.tar.gz`,
/// `.tgz`). Format internals stay inside the zip/tar/flate2 crates.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Unarchiver for ArchiveExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        match archive_kind(archive) {
            Some(ArchiveKind::Zip) => extract_zip(archive, destination),
            Some(ArchiveKind::Tar) => extract_tar(archive, destination),
            Some(ArchiveKind::TarGz) => extract_tar_gz(archive, destination),
            None => Err(DepackError::UnsupportedArchive {
                path: archive.display().to_string(),
            }),
        }
    }
}

fn archive_kind(path: &Path) -> Option<ArchiveKind> {
    let name = path.file_name()?.to_str()?.to_lowercase();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return Some(ArchiveKind::TarGz);
    }
    if name.ends_with(".tar") {
        return Some(ArchiveKind::Tar);
    }
    if name.ends_with(".zip") || name.ends_with(".jar") || name.ends_with(".war") {
        return Some(ArchiveKind::Zip);
    }

    None
}

fn extract_zip(archive: &Path, destination: &Path) -> Result<()> {
    let file = fs::File::open(archive).map_err(DepackError::Io)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|error| wrap(archive, error))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|error| wrap(archive, error))?;

        // Entries must stay inside the destination directory.
        let relative: PathBuf = match entry.enclosed_name() {
            Some(name) => name.to_path_buf(),
            None => {
                return Err(DepackError::InvalidPath {
                    path: entry.name().to_string(),
                })
            }
        };

        let target = destination.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(DepackError::Io)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(DepackError::Io)?;
        }
        let mut output = fs::File::create(&target).map_err(DepackError::Io)?;
        io::copy(&mut entry, &mut output).map_err(DepackError::Io)?;
    }

    Ok(())
}

fn extract_tar(archive: &Path, destination: &Path) -> Result<()> {
    let file = fs::File::open(archive).map_err(DepackError::Io)?;
    // tar::Archive::unpack refuses entries that would escape the destination.
    tar::Archive::new(file)
        .unpack(destination)
        .map_err(|error| wrap(archive, error))
}

fn extract_tar_gz(archive: &Path, destination: &Path) -> Result<()> {
    let file = fs::File::open(archive).map_err(DepackError::Io)?;
    let decoder = flate2::read::GzDecoder::new(file);
    tar::Archive::new(decoder)
        .unpack(destination)
        .map_err(|error| wrap(archive, error))
}

fn wrap<E: std::error::Error + Send + Sync + 'static>(archive: &Path, error: E) -> DepackError {
    DepackError::ExtractionFailed {
        archive: archive.display().to_string(),
        source: Box::new(error),
    }
}
