use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepackError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    // The next three carry fixed, stable messages so callers can tell the
    // causes apart without matching on variants.
    #[error("Unable to find a version for {group_id}:{artifact_id}:{kind} in the project dependencies")]
    VersionNotFound {
        group_id: String,
        artifact_id: String,
        kind: String,
    },

    #[error("Unable to find artifact.")]
    ArtifactNotFound { coordinate: String },

    #[error("Unable to resolve artifact.")]
    ArtifactResolutionFailed {
        coordinate: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to unpack archive: {archive}")]
    ExtractionFailed {
        archive: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("There are no items configured.")]
    NoItemsConfigured,

    #[error("Unsupported archive format: {path}")]
    UnsupportedArchive { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DepackError {
    fn user_message(&self) -> String {
        match self {
            DepackError::VersionNotFound {
                group_id,
                artifact_id,
                kind,
            } => {
                format!(
                    "No version declared for {}:{} ({}) in the project dependencies or dependency management",
                    group_id, artifact_id, kind
                )
            }
            DepackError::ArtifactNotFound { coordinate } => {
                format!("Unable to find artifact {} in the local repository", coordinate)
            }
            DepackError::ArtifactResolutionFailed { coordinate, source } => {
                format!("Unable to resolve artifact {}: {}", coordinate, source)
            }
            DepackError::ExtractionFailed { archive, source } => {
                format!("Failed to unpack {}: {}", archive, source)
            }
            DepackError::NoItemsConfigured => {
                "There are no items configured.".to_string()
            }
            DepackError::UnsupportedArchive { path } => {
                format!("Unsupported archive format: {}", path)
            }
            DepackError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            DepackError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            DepackError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            DepackError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DepackError::VersionNotFound { .. } => Some(
                "Add a version to the item, or declare the dependency (with a version) in [[project.dependencies]] or [[project.dependency_management]].".to_string()
            ),
            DepackError::ArtifactNotFound { .. } => Some(
                "Verify the coordinate and make sure the artifact file exists under the repository directory (--repository).".to_string()
            ),
            DepackError::ArtifactResolutionFailed { .. } => Some(
                "Check that the repository directory is readable and the artifact file is not corrupt.".to_string()
            ),
            DepackError::ExtractionFailed { .. } => Some(
                "The archive may be corrupt or truncated. Re-fetch the artifact and try again; the marker was not updated so the next run will retry.".to_string()
            ),
            DepackError::NoItemsConfigured => Some(
                "Add at least one [[items]] entry to the manifest, or run with --generate-config to produce a starting point.".to_string()
            ),
            DepackError::UnsupportedArchive { .. } => Some(
                "Supported archive types are .zip, .jar, .war, .tar, .tar.gz and .tgz.".to_string()
            ),
            DepackError::Config { .. } => Some(
                "Check your manifest syntax and ensure all required fields are present.".to_string()
            ),
            DepackError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DepackError {
    fn from(error: toml::de::Error) -> Self {
        DepackError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepackError>;
