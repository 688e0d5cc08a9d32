use clap::Parser;
use depack::{Cli, Depack, DepackError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create Depack instance
    let depack = match Depack::from_cli(&cli) {
        Ok(depack) => depack,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Handle dry run mode
    if cli.dry_run {
        return handle_dry_run(&depack);
    }

    // Resolve-and-report mode: no unpacking, no markers
    if cli.resolve_only {
        return match depack.resolve_dependencies() {
            Ok(_) => 0,
            Err(e) => {
                depack.handle_error(&e);
                exit_code_for(&e)
            }
        };
    }

    // Execute main unpack workflow
    match depack.unpack_dependencies().await {
        Ok(report) => {
            // Display final report based on output format
            depack.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            depack.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

// Map error types to appropriate exit codes
fn exit_code_for(error: &DepackError) -> i32 {
    match error {
        DepackError::Cancelled => 130, // Interrupted (SIGINT)
        DepackError::Config { .. } => 2,
        DepackError::VersionNotFound { .. } => 3,
        DepackError::ArtifactNotFound { .. } => 4,
        DepackError::ArtifactResolutionFailed { .. } => 5,
        DepackError::ExtractionFailed { .. } => 6,
        DepackError::NoItemsConfigured => 7,
        DepackError::UnsupportedArchive { .. } => 8,
        DepackError::Permission { .. } => 9,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let manifest_path = cli
        .manifest
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "depack.toml".to_string());

    match Depack::generate_sample_config(&manifest_path) {
        Ok(()) => {
            println!("Generated sample manifest file: {}", manifest_path);
            println!("\nTo use this manifest:");
            println!("  depack --manifest {}", manifest_path);
            println!("\nEdit the file to declare your project dependencies and unpack items.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate manifest file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(depack: &Depack) -> i32 {
    let formatter = depack.output_formatter();

    formatter.info("DRY RUN MODE - No artifacts will be unpacked");
    formatter.print_separator();

    let config = depack.config();

    formatter.info("Configuration that would be used:");
    println!("  Repository: {}", config.paths.repository.display());
    println!("  Output directory: {}", config.paths.output.display());
    println!("  Marker directory: {}", config.paths.markers.display());
    println!("  Overwrite if newer: {}", config.unpack.overwrite_if_newer);
    println!("  Overwrite releases: {}", config.unpack.overwrite_releases);
    println!(
        "  Overwrite snapshots: {}",
        config.unpack.overwrite_snapshots
    );

    if config.unpack.skip {
        formatter.warning("Skip is set - every item would be skipped by configuration");
    }

    formatter.print_separator();

    if config.items.is_empty() {
        formatter.error("There are no items configured.");
        return 7;
    }

    formatter.info("Unpack plan:");
    for item in &config.items {
        let coordinate = item.coordinate();
        let destination = item
            .destination
            .clone()
            .unwrap_or_else(|| config.paths.output.clone());
        let version = match coordinate.version.as_deref() {
            Some(version) => version.to_string(),
            None => "(resolved from project dependencies)".to_string(),
        };

        println!(
            "  {}:{} {} -> {}",
            coordinate.group_id,
            coordinate.artifact_id,
            version,
            destination.display()
        );
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform the actual unpack");

    0
}

fn print_startup_error(error: &DepackError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use depack::Config;
    use std::fs;
    use tempfile::TempDir;

    fn cli_with_manifest(manifest: Option<std::path::PathBuf>) -> Cli {
        Cli {
            manifest,
            repository: None,
            output: None,
            markers: None,
            overwrite_if_newer: None,
            overwrite_releases: None,
            overwrite_snapshots: None,
            skip: false,
            resolve_only: false,
            output_format: depack::cli::OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let manifest_path = temp_dir.path().join("test.toml");

        let mut cli = cli_with_manifest(Some(manifest_path.clone()));
        cli.generate_config = true;

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(manifest_path.exists());

        let content = fs::read_to_string(&manifest_path).unwrap();
        assert!(content.contains("[[items]]"));
    }

    #[test]
    fn test_dry_run_without_items() {
        let config = Config::default();
        let depack = Depack::new(config, OutputMode::Plain, 0, true).unwrap();

        let exit_code = handle_dry_run(&depack);
        assert_eq!(exit_code, 7);
    }

    #[test]
    fn test_exit_codes_are_distinct_per_variant() {
        let not_found = DepackError::ArtifactNotFound {
            coordinate: "org.example:lib:jar:1.0".to_string(),
        };
        let resolution_failed = DepackError::ArtifactResolutionFailed {
            coordinate: "org.example:lib:jar:1.0".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };

        assert_ne!(exit_code_for(&not_found), exit_code_for(&resolution_failed));
        assert_eq!(exit_code_for(&DepackError::Cancelled), 130);
        assert_eq!(exit_code_for(&DepackError::NoItemsConfigured), 7);
    }
}
