use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

// Timestamped snapshot versions look like "1.0-20240115.093021-4".
fn timestamped_snapshot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"-\d{8}\.\d{6}-\d+$").expect("timestamped snapshot pattern is valid")
    })
}

/// An artifact coordinate. The version is optional until resolved; identity
/// for matching purposes is (group_id, artifact_id, classifier, kind) with
/// the version deliberately excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

/// A dependency declared by the project model, always carrying a concrete
/// version. Originates from either the direct dependency list or the
/// dependency-management list; declaration order is preserved by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

pub(crate) fn default_kind() -> String {
    "jar".to_string()
}

/// Classifier equality treats an absent classifier and an empty-string
/// classifier as the same thing.
pub fn classifier_eq(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or("") == b.unwrap_or("")
}

/// Whether a version string denotes a snapshot build: either the literal
/// `-SNAPSHOT` suffix or the timestamped form a deployed snapshot carries.
pub fn is_snapshot_version(version: &str) -> bool {
    version.ends_with(SNAPSHOT_SUFFIX) || timestamped_snapshot_pattern().is_match(version)
}

impl Coordinate {
    pub fn new<S: Into<String>>(group_id: S, artifact_id: S, kind: S) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            classifier: None,
            kind: kind.into(),
        }
    }

    pub fn with_version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_classifier<S: Into<String>>(mut self, classifier: S) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Classifier normalized so that `Some("")` reads as "no classifier".
    pub fn classifier(&self) -> Option<&str> {
        match self.classifier.as_deref() {
            Some("") | None => None,
            other => other,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(is_snapshot_version)
    }

    /// Deterministic, filesystem-safe identity string used to key markers:
    /// `group_id-artifact_id[-classifier]-version-kind`, hyphen-joined so no
    /// colons ever appear.
    pub fn identity_string(&self) -> String {
        let mut id = format!("{}-{}", self.group_id, self.artifact_id);
        if let Some(classifier) = self.classifier() {
            id.push('-');
            id.push_str(classifier);
        }
        if let Some(version) = self.version.as_deref() {
            id.push('-');
            id.push_str(version);
        }
        id.push('-');
        id.push_str(&self.kind);
        id
    }

    /// The conventional artifact file name:
    /// `artifact_id-version[-classifier].kind`.
    pub fn artifact_file_name(&self) -> String {
        let mut name = self.artifact_id.clone();
        if let Some(version) = self.version.as_deref() {
            name.push('-');
            name.push_str(version);
        }
        if let Some(classifier) = self.classifier() {
            name.push('-');
            name.push_str(classifier);
        }
        name.push('.');
        name.push_str(&self.kind);
        name
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(classifier) = self.classifier() {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.kind)?;
        if let Some(version) = self.version.as_deref() {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

impl DeclaredDependency {
    /// Classifier normalized the same way as `Coordinate::classifier`.
    pub fn classifier(&self) -> Option<&str> {
        match self.classifier.as_deref() {
            Some("") | None => None,
            other => other,
        }
    }
}

impl From<&DeclaredDependency> for Coordinate {
    fn from(dependency: &DeclaredDependency) -> Self {
        Coordinate {
            group_id: dependency.group_id.clone(),
            artifact_id: dependency.artifact_id.clone(),
            version: Some(dependency.version.clone()),
            classifier: dependency.classifier.clone(),
            kind: dependency.kind.clone(),
        }
    }
}
