use crate::artifact::{classifier_eq, DeclaredDependency};
use crate::error::{DepackError, Result};

/// A request to resolve the version of a coordinate that was configured
/// without one. Identity fields only; the version is the value being
/// resolved. `remove_version` records that the caller tolerates a silent
/// miss instead of a hard failure.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub kind: String,
    pub remove_version: bool,
}

impl ResolutionRequest {
    pub fn new<S: Into<String>>(group_id: S, artifact_id: S, kind: S) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: None,
            kind: kind.into(),
            remove_version: false,
        }
    }

    pub fn with_classifier<S: Into<String>>(mut self, classifier: S) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn tolerate_missing(mut self, remove_version: bool) -> Self {
        self.remove_version = remove_version;
        self
    }
}

/// Resolve a missing version from the project's declared dependencies.
///
/// The search is deterministic and ordered: the direct dependency list is
/// scanned first in declaration order, then the dependency-management list.
/// The first entry whose identity (group, artifact, classifier, kind)
/// matches the request wins; this is a first-match policy, not best-match,
/// so duplicated entries resolve to whichever was declared first. A match
/// in the direct list always beats the managed list regardless of where
/// either entry sits in its own list.
///
/// Pure function over its inputs: the same configuration resolves
/// identically across repeated builds.
pub fn resolve_version(
    request: &ResolutionRequest,
    direct: &[DeclaredDependency],
    managed: &[DeclaredDependency],
) -> Result<String> {
    if let Some(dependency) = first_identity_match(request, direct) {
        return Ok(dependency.version.clone());
    }

    if let Some(dependency) = first_identity_match(request, managed) {
        return Ok(dependency.version.clone());
    }

    Err(DepackError::VersionNotFound {
        group_id: request.group_id.clone(),
        artifact_id: request.artifact_id.clone(),
        kind: request.kind.clone(),
    })
}

fn first_identity_match<'a>(
    request: &ResolutionRequest,
    dependencies: &'a [DeclaredDependency],
) -> Option<&'a DeclaredDependency> {
    dependencies.iter().find(|dependency| {
        dependency.group_id == request.group_id
            && dependency.artifact_id == request.artifact_id
            && classifier_eq(request.classifier.as_deref(), dependency.classifier.as_deref())
            && dependency.kind == request.kind
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(classifier: Option<&str>, version: &str, kind: &str) -> DeclaredDependency {
        DeclaredDependency {
            group_id: "groupId".to_string(),
            artifact_id: "artifactId".to_string(),
            version: version.to_string(),
            classifier: classifier.map(str::to_string),
            kind: kind.to_string(),
        }
    }

    // Mirrors a typical project dependency list: a classified entry declared
    // before the plain one.
    fn direct_dependencies() -> Vec<DeclaredDependency> {
        vec![
            declared(Some("classifier"), "2.1", "jar"),
            declared(None, "2.0-SNAPSHOT", "jar"),
        ]
    }

    fn managed_dependencies() -> Vec<DeclaredDependency> {
        vec![
            declared(Some("classifier"), "3.1", "jar"),
            declared(None, "3.0-SNAPSHOT", "jar"),
        ]
    }

    #[test]
    fn test_resolves_from_direct_dependencies() {
        let request = ResolutionRequest::new("groupId", "artifactId", "jar");
        let version = resolve_version(&request, &direct_dependencies(), &[]).unwrap();
        assert_eq!(version, "2.0-SNAPSHOT");
    }

    #[test]
    fn test_resolves_classified_request_from_direct_dependencies() {
        let request =
            ResolutionRequest::new("groupId", "artifactId", "jar").with_classifier("classifier");
        let version = resolve_version(&request, &direct_dependencies(), &[]).unwrap();
        assert_eq!(version, "2.1");
    }

    #[test]
    fn test_falls_back_to_dependency_management() {
        let request = ResolutionRequest::new("groupId", "artifactId", "jar");
        let version = resolve_version(&request, &[], &managed_dependencies()).unwrap();
        assert_eq!(version, "3.0-SNAPSHOT");
    }

    #[test]
    fn test_classifier_isolation_in_dependency_management() {
        // The "" entry at 3.0-SNAPSHOT must not shadow the classified entry.
        let managed = vec![
            declared(Some(""), "3.0-SNAPSHOT", "jar"),
            declared(Some("classifier"), "3.1", "jar"),
        ];

        let request =
            ResolutionRequest::new("groupId", "artifactId", "jar").with_classifier("classifier");
        let version = resolve_version(&request, &[], &managed).unwrap();
        assert_eq!(version, "3.1");
    }

    #[test]
    fn test_direct_wins_over_managed() {
        let request = ResolutionRequest::new("groupId", "artifactId", "jar");
        let version =
            resolve_version(&request, &direct_dependencies(), &managed_dependencies()).unwrap();
        assert_eq!(version, "2.0-SNAPSHOT");
    }

    #[test]
    fn test_first_match_wins_over_later_duplicates() {
        let direct = vec![
            declared(None, "2.1-classifierVariant", "jar"),
            declared(None, "2.0-SNAPSHOT", "jar"),
        ];

        let request = ResolutionRequest::new("groupId", "artifactId", "jar");
        let version = resolve_version(&request, &direct, &[]).unwrap();
        assert_eq!(version, "2.1-classifierVariant");
    }

    #[test]
    fn test_empty_classifier_matches_unclassified_request() {
        let direct = vec![declared(Some(""), "1.5", "jar")];
        let request = ResolutionRequest::new("groupId", "artifactId", "jar");
        assert_eq!(resolve_version(&request, &direct, &[]).unwrap(), "1.5");
    }

    #[test]
    fn test_kind_is_matched_exactly() {
        let request = ResolutionRequest::new("groupId", "artifactId", "war");
        let result = resolve_version(&request, &direct_dependencies(), &[]);
        assert!(matches!(result, Err(DepackError::VersionNotFound { .. })));
    }

    #[test]
    fn test_miss_reports_the_unresolved_coordinate() {
        let request = ResolutionRequest::new("groupId", "artifactId", "type");
        let error = resolve_version(&request, &[], &[]).unwrap_err();

        let message = error.to_string();
        assert!(message.contains("groupId"));
        assert!(message.contains("artifactId"));
        assert!(message.contains("type"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let request =
            ResolutionRequest::new("groupId", "artifactId", "jar").with_classifier("classifier");
        let direct = direct_dependencies();
        let managed = managed_dependencies();

        let first = resolve_version(&request, &direct, &managed).unwrap();
        let second = resolve_version(&request, &direct, &managed).unwrap();
        assert_eq!(first, second);
    }
}
