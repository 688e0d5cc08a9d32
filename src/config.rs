use crate::artifact::{Coordinate, DeclaredDependency};
use crate::error::{DepackError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    #[serde(default)]
    pub unpack: UnpackConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// The project model: ordered dependency lists, read-only inputs for
/// version resolution. Declaration order in the manifest is preserved.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
    #[serde(default)]
    pub dependency_management: Vec<DeclaredDependency>,
}

/// One artifact to unpack. The version may be omitted, in which case it is
/// resolved from the project dependency lists. `destination` overrides the
/// shared output directory for this item only; markers remain keyed by
/// coordinate identity, so changing the override between runs does not
/// re-trigger extraction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub remove_version: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnpackConfig {
    pub overwrite_if_newer: bool,
    pub overwrite_releases: bool,
    pub overwrite_snapshots: bool,
    pub skip: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub repository: PathBuf,
    pub output: PathBuf,
    pub markers: PathBuf,
}

fn default_kind() -> String {
    "jar".to_string()
}

impl Default for UnpackConfig {
    fn default() -> Self {
        Self {
            overwrite_if_newer: true,
            overwrite_releases: false,
            overwrite_snapshots: false,
            skip: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            repository: PathBuf::from("repository"),
            output: PathBuf::from("target/dependency"),
            markers: PathBuf::from("target/depack-markers"),
        }
    }
}

impl ItemConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            classifier: self.classifier.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direct_dependencies(&self) -> &[DeclaredDependency] {
        &self.project.dependencies
    }

    pub fn managed_dependencies(&self) -> &[DeclaredDependency] {
        &self.project.dependency_management
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DepackError::Config {
                message: format!("Manifest file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DepackError::Config {
            message: format!("Failed to read manifest {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| DepackError::Config {
            message: format!("Failed to parse manifest {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(manifest_path: Option<P>) -> Result<Self> {
        match manifest_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["depack.toml", "depack.config.toml", ".depack.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref repository) = cli_args.repository {
            self.paths.repository = repository.clone();
        }

        if let Some(ref output) = cli_args.output {
            self.paths.output = output.clone();
        }

        if let Some(ref markers) = cli_args.markers {
            self.paths.markers = markers.clone();
        }

        if let Some(overwrite_if_newer) = cli_args.overwrite_if_newer {
            self.unpack.overwrite_if_newer = overwrite_if_newer;
        }

        if let Some(overwrite_releases) = cli_args.overwrite_releases {
            self.unpack.overwrite_releases = overwrite_releases;
        }

        if let Some(overwrite_snapshots) = cli_args.overwrite_snapshots {
            self.unpack.overwrite_snapshots = overwrite_snapshots;
        }

        if let Some(skip) = cli_args.skip {
            self.unpack.skip = skip;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| DepackError::Config {
            message: format!("Failed to serialize manifest: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| DepackError::Config {
            message: format!("Failed to write manifest {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for item in &self.items {
            if item.group_id.is_empty() || item.artifact_id.is_empty() {
                return Err(DepackError::Config {
                    message: "Items must declare a non-empty group_id and artifact_id".to_string(),
                });
            }

            if item.kind.is_empty() {
                return Err(DepackError::Config {
                    message: format!(
                        "Item {}:{} must declare a non-empty type",
                        item.group_id, item.artifact_id
                    ),
                });
            }
        }

        for dependency in self
            .project
            .dependencies
            .iter()
            .chain(&self.project.dependency_management)
        {
            if dependency.version.is_empty() {
                return Err(DepackError::Config {
                    message: format!(
                        "Declared dependency {}:{} must carry a version",
                        dependency.group_id, dependency.artifact_id
                    ),
                });
            }
        }

        if self.paths.repository.as_os_str().is_empty()
            || self.paths.output.as_os_str().is_empty()
            || self.paths.markers.as_os_str().is_empty()
        {
            return Err(DepackError::Config {
                message: "Repository, output and markers paths must be non-empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample = Self {
            project: ProjectConfig {
                dependencies: vec![DeclaredDependency {
                    group_id: "org.example".to_string(),
                    artifact_id: "example-lib".to_string(),
                    version: "1.2.0".to_string(),
                    classifier: None,
                    kind: "jar".to_string(),
                }],
                dependency_management: Vec::new(),
            },
            items: vec![ItemConfig {
                group_id: "org.example".to_string(),
                artifact_id: "example-lib".to_string(),
                version: None,
                classifier: None,
                kind: "jar".to_string(),
                destination: None,
                remove_version: false,
            }],
            unpack: UnpackConfig::default(),
            paths: PathsConfig::default(),
        };

        toml::to_string_pretty(&sample).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub repository: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub markers: Option<PathBuf>,
    pub overwrite_if_newer: Option<bool>,
    pub overwrite_releases: Option<bool>,
    pub overwrite_snapshots: Option<bool>,
    pub skip: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, repository: Option<PathBuf>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_markers(mut self, markers: Option<PathBuf>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_overwrite_if_newer(mut self, overwrite_if_newer: Option<bool>) -> Self {
        self.overwrite_if_newer = overwrite_if_newer;
        self
    }

    pub fn with_overwrite_releases(mut self, overwrite_releases: Option<bool>) -> Self {
        self.overwrite_releases = overwrite_releases;
        self
    }

    pub fn with_overwrite_snapshots(mut self, overwrite_snapshots: Option<bool>) -> Self {
        self.overwrite_snapshots = overwrite_snapshots;
        self
    }

    pub fn with_skip(mut self, skip: Option<bool>) -> Self {
        self.skip = skip;
        self
    }
}
