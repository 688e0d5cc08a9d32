use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Unpack project dependency artifacts into target directories")]
#[command(
    long_about = "Depack resolves the artifacts configured in a project manifest, unpacks \
                       them into target directories, and tracks completion with marker files \
                       so repeated builds skip work that is already up to date."
)]
#[command(after_help = "EXAMPLES:\n  \
    depack\n  \
    depack --manifest build/depack.toml --verbose\n  \
    depack --repository ~/.cache/artifacts --output target/deps\n  \
    depack --overwrite-snapshots true --markers target/markers\n  \
    depack --resolve-only\n\n\
    For more information, visit: https://github.com/user/depack")]
pub struct Cli {
    /// Manifest file path (defaults to depack.toml in the working directory)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Local repository directory to locate artifacts in
    #[arg(short, long)]
    pub repository: Option<PathBuf>,

    /// Shared output directory for unpacked items
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory holding the extraction marker files
    #[arg(long)]
    pub markers: Option<PathBuf>,

    /// Re-extract when the artifact file is newer than its marker
    #[arg(long, help = "Overwrite when the source artifact is newer than the marker")]
    pub overwrite_if_newer: Option<bool>,

    /// Re-extract release artifacts even when a marker exists
    #[arg(long, help = "Always overwrite release artifacts")]
    pub overwrite_releases: Option<bool>,

    /// Re-extract snapshot artifacts even when a marker exists
    #[arg(long, help = "Always overwrite snapshot artifacts")]
    pub overwrite_snapshots: Option<bool>,

    /// Skip all unpack work for this run
    #[arg(long, help = "Skip extraction entirely; no markers are written")]
    pub skip: bool,

    /// Resolve the project dependencies and report them without unpacking
    #[arg(long, help = "Print the resolved artifact file for each project dependency")]
    pub resolve_only: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be unpacked without actually doing it")]
    pub dry_run: bool,

    /// Generate sample manifest file
    #[arg(long, help = "Generate a sample manifest file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.manifest.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_repository(self.repository.clone())
            .with_output(self.output.clone())
            .with_markers(self.markers.clone())
            .with_overwrite_if_newer(self.overwrite_if_newer)
            .with_overwrite_releases(self.overwrite_releases)
            .with_overwrite_snapshots(self.overwrite_snapshots)
            .with_skip(if self.skip { Some(true) } else { None })
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            manifest: None,
            repository: None,
            output: None,
            markers: None,
            overwrite_if_newer: None,
            overwrite_releases: None,
            overwrite_snapshots: None,
            skip: false,
            resolve_only: false,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_overrides_only_carry_given_flags() {
        let overrides = cli().create_cli_overrides();

        assert!(overrides.repository.is_none());
        assert!(overrides.overwrite_if_newer.is_none());
        assert!(overrides.skip.is_none());
    }

    #[test]
    fn test_skip_flag_becomes_override() {
        let mut cli = cli();
        cli.skip = true;

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.skip, Some(true));
    }

    #[test]
    fn test_path_overrides_pass_through() {
        let mut cli = cli();
        cli.repository = Some(PathBuf::from("/repo"));
        cli.markers = Some(PathBuf::from("/markers"));

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.repository, Some(PathBuf::from("/repo")));
        assert_eq!(overrides.markers, Some(PathBuf::from("/markers")));
    }

    #[test]
    fn test_verbosity_levels() {
        let mut cli = cli();
        cli.verbose = 2;
        assert!(cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 2);

        cli.quiet = true;
        assert!(!cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_cli_parses_overwrite_values() {
        let cli = Cli::try_parse_from([
            "depack",
            "--overwrite-snapshots",
            "true",
            "--overwrite-releases",
            "false",
        ])
        .unwrap();

        assert_eq!(cli.overwrite_snapshots, Some(true));
        assert_eq!(cli.overwrite_releases, Some(false));
        assert_eq!(cli.overwrite_if_newer, None);
    }
}
