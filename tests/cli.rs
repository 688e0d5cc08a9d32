use assert_cmd::Command;
use depack::{Config, Coordinate, DeclaredDependency, ItemConfig, LocalRepositoryLocator};
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn depack() -> Command {
    Command::cargo_bin("depack").unwrap()
}

fn write_artifact_zip(repository: &Path, coordinate: &Coordinate) -> PathBuf {
    let locator = LocalRepositoryLocator::new(repository);
    let path = locator.artifact_path(coordinate);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let file = fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("lib.txt", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"library contents").unwrap();
    writer.finish().unwrap();

    path
}

fn scratch_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.paths.repository = temp_dir.path().join("repository");
    config.paths.output = temp_dir.path().join("output");
    config.paths.markers = temp_dir.path().join("markers");
    config
}

fn item() -> ItemConfig {
    ItemConfig {
        group_id: "org.example".to_string(),
        artifact_id: "lib".to_string(),
        version: Some("1.0".to_string()),
        classifier: None,
        kind: "jar".to_string(),
        destination: None,
        remove_version: false,
    }
}

#[test]
fn unpacks_once_then_reports_up_to_date() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = scratch_config(&temp_dir);
    config.items.push(item());
    config.unpack.overwrite_if_newer = false;

    let coordinate = Coordinate::new("org.example", "lib", "jar").with_version("1.0");
    write_artifact_zip(&config.paths.repository, &coordinate);

    let manifest = temp_dir.path().join("depack.toml");
    config.save_to_file(&manifest).unwrap();

    depack()
        .args(["--manifest", manifest.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extracted: 1"));

    assert!(temp_dir.path().join("output/lib.txt").exists());
    assert!(temp_dir
        .path()
        .join("markers/org.example-lib-1.0-jar.marker")
        .exists());

    depack()
        .args(["--manifest", manifest.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date: 1"));
}

#[test]
fn resolve_only_prints_resolved_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = scratch_config(&temp_dir);
    config.project.dependencies.push(DeclaredDependency {
        group_id: "org.example".to_string(),
        artifact_id: "lib".to_string(),
        version: "1.0".to_string(),
        classifier: None,
        kind: "jar".to_string(),
    });

    let coordinate = Coordinate::new("org.example", "lib", "jar").with_version("1.0");
    write_artifact_zip(&config.paths.repository, &coordinate);

    let manifest = temp_dir.path().join("depack.toml");
    config.save_to_file(&manifest).unwrap();

    depack()
        .args([
            "--manifest",
            manifest.to_str().unwrap(),
            "--resolve-only",
            "--output-format",
            "plain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved: lib-1.0.jar"));

    // No unpacking happened.
    assert!(!temp_dir.path().join("output").exists());
    assert!(!temp_dir.path().join("markers").exists());
}

#[test]
fn empty_item_list_fails_loudly() {
    let temp_dir = TempDir::new().unwrap();
    let config = scratch_config(&temp_dir);

    let manifest = temp_dir.path().join("depack.toml");
    config.save_to_file(&manifest).unwrap();

    depack()
        .args(["--manifest", manifest.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("There are no items configured."));
}

#[test]
fn skip_flag_suppresses_extraction() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = scratch_config(&temp_dir);
    config.items.push(item());

    let coordinate = Coordinate::new("org.example", "lib", "jar").with_version("1.0");
    write_artifact_zip(&config.paths.repository, &coordinate);

    let manifest = temp_dir.path().join("depack.toml");
    config.save_to_file(&manifest).unwrap();

    depack()
        .args([
            "--manifest",
            manifest.to_str().unwrap(),
            "--skip",
            "--output-format",
            "plain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: 1"));

    assert!(!temp_dir.path().join("output/lib.txt").exists());
    assert!(!temp_dir.path().join("markers").exists());
}

#[test]
fn generate_config_writes_a_sample_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("sample.toml");

    depack()
        .args(["--manifest", manifest.to_str().unwrap(), "--generate-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample manifest file"));

    let content = fs::read_to_string(&manifest).unwrap();
    assert!(content.contains("[[items]]"));
    assert!(content.contains("[unpack]"));
}

#[test]
fn missing_artifact_maps_to_its_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = scratch_config(&temp_dir);
    config.items.push(item());
    // Repository left empty on purpose.

    let manifest = temp_dir.path().join("depack.toml");
    config.save_to_file(&manifest).unwrap();

    depack()
        .args(["--manifest", manifest.to_str().unwrap(), "--output-format", "plain"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unable to find artifact"));
}
