pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;
pub mod ui;
pub mod unpack;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ItemConfig, PathsConfig, ProjectConfig, UnpackConfig};
pub use error::{DepackError, Result, UserFriendlyError};

// Core functionality re-exports
pub use artifact::{Coordinate, DeclaredDependency};
pub use resolver::{resolve_version, ArtifactLocator, LocalRepositoryLocator, ResolutionRequest};
pub use unpack::{
    ArchiveExtractor, FileMarkerStore, ItemReport, MarkerStore, Outcome, OverwritePolicy,
    ReportWriter, RunReport, UnpackRequest, UnpackTracker, Unarchiver,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task;

/// Main library interface for Depack functionality
pub struct Depack {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl Depack {
    /// Create a new Depack instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new Depack instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create Depack instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Process every configured item: resolve its version if absent, locate
    /// the artifact file, and unpack it unless the marker says it is already
    /// up to date.
    pub async fn unpack_dependencies(&self) -> Result<RunReport> {
        let start_time = Instant::now();

        self.shutdown.check_shutdown()?;

        if self.config.items.is_empty() {
            return Err(DepackError::NoItemsConfigured);
        }

        self.output_formatter
            .start_operation("Unpacking dependency artifacts");

        let locator = LocalRepositoryLocator::new(&self.config.paths.repository);
        let item_progress = self
            .progress_manager
            .create_item_progress(self.config.items.len() as u64);

        let mut reports = Vec::with_capacity(self.config.items.len());
        for (index, item) in self.config.items.iter().enumerate() {
            self.shutdown.check_shutdown()?;

            ui::progress::update_item_progress(
                &item_progress,
                index as u64,
                &format!("{}:{}", item.group_id, item.artifact_id),
            );

            if let Some(report) = self.process_item(item, &locator).await? {
                self.output_formatter.info(&format!(
                    "{} - {}",
                    report.coordinate,
                    report.outcome.describe()
                ));
                reports.push(report);
            }
            item_progress.inc(1);
        }

        ui::progress::finish_progress_with_summary(
            &item_progress,
            &format!("Processed {} items", reports.len()),
            start_time.elapsed(),
        );

        let report = RunReport::new(reports, start_time.elapsed());
        ReportWriter::new(&self.config.paths.output).write(&report)?;
        self.output_formatter.print_run_summary(&report);

        Ok(report)
    }

    /// Handle a single item. Returns `None` when the item tolerates a failed
    /// version resolution (`remove_version`) and was skipped with a warning.
    async fn process_item(
        &self,
        item: &ItemConfig,
        locator: &LocalRepositoryLocator,
    ) -> Result<Option<ItemReport>> {
        let mut coordinate = item.coordinate();

        if coordinate.version.is_none() {
            let request = ResolutionRequest {
                group_id: item.group_id.clone(),
                artifact_id: item.artifact_id.clone(),
                classifier: item.classifier.clone(),
                kind: item.kind.clone(),
                remove_version: item.remove_version,
            };

            match resolve_version(
                &request,
                self.config.direct_dependencies(),
                self.config.managed_dependencies(),
            ) {
                Ok(version) => {
                    self.output_formatter
                        .debug(&format!("Resolved {} to version {}", coordinate, version));
                    coordinate.version = Some(version);
                }
                Err(error @ DepackError::VersionNotFound { .. }) if item.remove_version => {
                    self.output_formatter
                        .warning(&format!("Skipping {}: {}", coordinate, error));
                    return Ok(None);
                }
                Err(error) => return Err(error),
            }
        }

        let archive = locator.locate(&coordinate)?;
        let source_modified = fs::metadata(&archive)
            .and_then(|metadata| metadata.modified())
            .map_err(DepackError::Io)?;

        let destination = item
            .destination
            .clone()
            .unwrap_or_else(|| self.config.paths.output.clone());

        let request = UnpackRequest::new(
            archive.clone(),
            source_modified,
            destination.clone(),
            coordinate.identity_string(),
        )
        .with_snapshot(coordinate.is_snapshot());

        let outcome = self.run_tracker(request).await?;

        Ok(Some(ItemReport {
            coordinate: coordinate.to_string(),
            outcome,
            archive: archive.display().to_string(),
            destination: destination.display().to_string(),
        }))
    }

    /// Extraction can be long-running for large archives, so the tracker runs
    /// off the async thread.
    async fn run_tracker(&self, request: UnpackRequest) -> Result<Outcome> {
        let policy = OverwritePolicy {
            if_newer: self.config.unpack.overwrite_if_newer,
            releases: self.config.unpack.overwrite_releases,
            snapshots: self.config.unpack.overwrite_snapshots,
        };
        let skip = self.config.unpack.skip;
        let markers_dir = self.config.paths.markers.clone();

        task::spawn_blocking(move || {
            let markers = FileMarkerStore::new(markers_dir);
            let tracker = UnpackTracker::new(policy).with_skip(skip);
            tracker.process(&request, &markers, &ArchiveExtractor::new())
        })
        .await
        .map_err(|e| DepackError::Config {
            message: format!("Unpack task failed: {}", e),
        })?
    }

    /// Resolve every direct project dependency to a local artifact file and
    /// report it, without unpacking anything.
    pub fn resolve_dependencies(&self) -> Result<Vec<PathBuf>> {
        self.output_formatter
            .start_operation("Resolving project dependencies");

        let locator = LocalRepositoryLocator::new(&self.config.paths.repository);

        let mut files = Vec::with_capacity(self.config.direct_dependencies().len());
        for dependency in self.config.direct_dependencies() {
            self.shutdown.check_shutdown()?;

            let coordinate = Coordinate::from(dependency);
            let file = locator.locate(&coordinate)?;

            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            self.output_formatter.print_resolved(&file_name);

            files.push(file);
        }

        Ok(files)
    }

    /// Generate sample manifest file
    pub fn generate_sample_config<P: AsRef<std::path::Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(DepackError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &DepackError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
