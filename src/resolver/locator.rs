use crate::artifact::Coordinate;
use crate::error::{DepackError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maps a fully specified coordinate to a readable local artifact file.
pub trait ArtifactLocator {
    fn locate(&self, coordinate: &Coordinate) -> Result<PathBuf>;
}

/// Locator backed by a local repository directory using the conventional
/// layout: `<root>/<group path>/<artifact>/<version>/<file name>`, where the
/// group path is the group id with dots turned into path separators.
///
/// Local path mapping only; nothing here talks to a network.
pub struct LocalRepositoryLocator {
    root: PathBuf,
}

impl LocalRepositoryLocator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, coordinate: &Coordinate) -> PathBuf {
        let mut path = self.root.clone();
        for segment in coordinate.group_id.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact_id);
        if let Some(version) = coordinate.version.as_deref() {
            path.push(version);
        }
        path.push(coordinate.artifact_file_name());
        path
    }
}

impl ArtifactLocator for LocalRepositoryLocator {
    fn locate(&self, coordinate: &Coordinate) -> Result<PathBuf> {
        if coordinate.version.is_none() {
            return Err(DepackError::ArtifactResolutionFailed {
                coordinate: coordinate.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "coordinate has no version",
                ),
            });
        }

        let path = self.artifact_path(coordinate);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(DepackError::ArtifactNotFound {
                coordinate: coordinate.to_string(),
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(DepackError::ArtifactNotFound {
                    coordinate: coordinate.to_string(),
                })
            }
            Err(error) => Err(DepackError::ArtifactResolutionFailed {
                coordinate: coordinate.to_string(),
                source: error,
            }),
        }
    }
}
