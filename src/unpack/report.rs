use crate::error::{DepackError, Result};
use crate::unpack::tracker::Outcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub coordinate: String,
    pub outcome: Outcome,
    pub archive: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
    pub extracted: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub duration: Duration,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(items: Vec<ItemReport>, duration: Duration) -> Self {
        let extracted = items
            .iter()
            .filter(|i| i.outcome == Outcome::Extracted)
            .count();
        let up_to_date = items
            .iter()
            .filter(|i| i.outcome == Outcome::SkippedUpToDate)
            .count();
        let skipped = items
            .iter()
            .filter(|i| i.outcome == Outcome::SkippedByConfiguration)
            .count();

        Self {
            items,
            extracted,
            up_to_date,
            skipped,
            duration,
            generated_at: Utc::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}

/// Writes the per-run report files into a `.depack` metadata directory under
/// the shared output root.
pub struct ReportWriter {
    output_root: PathBuf,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(output_root: P) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.output_root.join(".depack")
    }

    pub fn write(&self, report: &RunReport) -> Result<()> {
        fs::create_dir_all(self.metadata_dir()).map_err(DepackError::Io)?;

        self.save_report_json(report)?;
        self.save_report_text(report)?;

        Ok(())
    }

    fn save_report_json(&self, report: &RunReport) -> Result<()> {
        let report_path = self.metadata_dir().join("unpack_report.json");
        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| DepackError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content).map_err(DepackError::Io)?;

        Ok(())
    }

    fn save_report_text(&self, report: &RunReport) -> Result<()> {
        let report_path = self.metadata_dir().join("unpack_report.txt");
        let mut file = fs::File::create(&report_path).map_err(DepackError::Io)?;

        writeln!(file, "Depack Unpack Report")?;
        writeln!(file, "====================")?;
        writeln!(file)?;
        writeln!(
            file,
            "Generated at: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(file, "Duration: {:?}", report.duration)?;
        writeln!(file)?;

        writeln!(file, "Summary:")?;
        writeln!(file, "  Items processed: {}", report.total())?;
        writeln!(file, "  Extracted: {}", report.extracted)?;
        writeln!(file, "  Up to date: {}", report.up_to_date)?;
        writeln!(file, "  Skipped by configuration: {}", report.skipped)?;
        writeln!(file)?;

        writeln!(file, "Items:")?;
        for item in &report.items {
            writeln!(file, "  {} - {}", item.coordinate, item.outcome.describe())?;
            writeln!(file, "    Archive: {}", item.archive)?;

            let (files, bytes) = destination_inventory(Path::new(&item.destination));
            writeln!(
                file,
                "    Destination: {} ({} files, {})",
                item.destination,
                files,
                format_bytes(bytes)
            )?;
        }

        Ok(())
    }
}

/// Counts the files and bytes currently present under a destination
/// directory. Missing directories read as empty.
pub fn destination_inventory(path: &Path) -> (usize, u64) {
    let mut files = 0usize;
    let mut bytes = 0u64;

    for entry in WalkDir::new(path).into_iter().flatten() {
        if entry.file_type().is_file() {
            files += 1;
            bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    (files, bytes)
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
