use crate::error::{DepackError, Result};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Persisted completion records keyed by artifact identity. The stored
/// timestamp encodes when extraction last completed for that identity.
/// Implementations may use any backing as long as per-identity timestamp
/// semantics are preserved.
pub trait MarkerStore {
    fn get(&self, identity: &str) -> Result<Option<SystemTime>>;
    fn touch(&self, identity: &str) -> Result<()>;
}

/// File-backed marker store: one `<identity>.marker` file per artifact
/// identity in a dedicated directory, with the file's own mtime carrying
/// the completion timestamp. Markers are never deleted here; an external
/// clean may remove the whole directory.
pub struct FileMarkerStore {
    directory: PathBuf,
}

impl FileMarkerStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn marker_path(&self, identity: &str) -> PathBuf {
        self.directory.join(format!("{}.marker", identity))
    }

    fn ensure_directory(&self) -> Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(DepackError::Io)?;
        }

        // Probe write permissions early so a read-only marker directory
        // surfaces as a permission problem, not a cryptic touch failure.
        tempfile::tempfile_in(&self.directory).map_err(|error| DepackError::Permission {
            path: format!(
                "No write permission for marker directory {}: {}",
                self.directory.display(),
                error
            ),
        })?;

        Ok(())
    }
}

impl MarkerStore for FileMarkerStore {
    fn get(&self, identity: &str) -> Result<Option<SystemTime>> {
        match fs::metadata(self.marker_path(identity)) {
            Ok(metadata) => {
                let modified = metadata.modified().map_err(DepackError::Io)?;
                Ok(Some(modified))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(DepackError::Io(error)),
        }
    }

    fn touch(&self, identity: &str) -> Result<()> {
        self.ensure_directory()?;

        let path = self.marker_path(identity);
        if !path.exists() {
            fs::File::create(&path).map_err(DepackError::Io)?;
        }

        filetime::set_file_mtime(&path, FileTime::now()).map_err(DepackError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const IDENTITY: &str = "org.example-lib-1.0-jar";

    #[test]
    fn test_get_without_marker() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMarkerStore::new(temp_dir.path());

        assert!(store.get(IDENTITY).unwrap().is_none());
    }

    #[test]
    fn test_touch_creates_marker_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMarkerStore::new(temp_dir.path().join("markers"));

        store.touch(IDENTITY).unwrap();

        assert!(store.marker_path(IDENTITY).exists());
        assert!(store.get(IDENTITY).unwrap().is_some());
    }

    #[test]
    fn test_marker_file_name_uses_identity() {
        let store = FileMarkerStore::new("/markers");
        assert_eq!(
            store.marker_path(IDENTITY),
            PathBuf::from("/markers/org.example-lib-1.0-jar.marker")
        );
    }

    #[test]
    fn test_touch_advances_existing_marker() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMarkerStore::new(temp_dir.path());

        store.touch(IDENTITY).unwrap();

        // Age the marker by twenty seconds, then touch again.
        let aged = FileTime::from_unix_time(FileTime::now().unix_seconds() - 20, 0);
        filetime::set_file_mtime(store.marker_path(IDENTITY), aged).unwrap();
        let before = store.get(IDENTITY).unwrap().unwrap();

        store.touch(IDENTITY).unwrap();
        let after = store.get(IDENTITY).unwrap().unwrap();

        assert!(after > before);
    }

    #[test]
    fn test_distinct_identities_have_distinct_markers() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMarkerStore::new(temp_dir.path());

        store.touch(IDENTITY).unwrap();

        assert!(store.get(IDENTITY).unwrap().is_some());
        assert!(store.get("org.example-lib-2.0-jar").unwrap().is_none());
    }
}
