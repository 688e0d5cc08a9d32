use crate::error::{DepackError, Result};
use crate::unpack::archive::Unarchiver;
use crate::unpack::markers::MarkerStore;
use filetime::FileTime;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

/// What happened to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Extracted,
    SkippedUpToDate,
    SkippedByConfiguration,
}

impl Outcome {
    pub fn describe(&self) -> &'static str {
        match self {
            Outcome::Extracted => "extracted",
            Outcome::SkippedUpToDate => "up to date",
            Outcome::SkippedByConfiguration => "skipped by configuration",
        }
    }
}

/// Run-wide overwrite policy, evaluated against each item's marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverwritePolicy {
    pub if_newer: bool,
    pub releases: bool,
    pub snapshots: bool,
}

/// One item's extraction request: the located artifact file with its
/// last-modified timestamp, the directory to unpack into, and the marker
/// identity. The destination may be a per-item override; markers stay keyed
/// by coordinate identity either way, so re-pointing the destination for one
/// run does not defeat staleness tracking (a deliberate simplification —
/// a re-pointed destination can read "up to date" while empty).
#[derive(Debug, Clone)]
pub struct UnpackRequest {
    pub source_file: PathBuf,
    pub source_modified: SystemTime,
    pub destination: PathBuf,
    pub marker_id: String,
    pub snapshot: bool,
}

impl UnpackRequest {
    pub fn new<P: Into<PathBuf>>(
        source_file: P,
        source_modified: SystemTime,
        destination: P,
        marker_id: String,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            source_modified,
            destination: destination.into(),
            marker_id,
            snapshot: false,
        }
    }

    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }
}

/// The marker-based idempotent extraction engine: decides whether an item
/// needs extracting, delegates the actual archive work to an [`Unarchiver`],
/// and maintains the completion marker.
pub struct UnpackTracker {
    policy: OverwritePolicy,
    skip: bool,
}

impl UnpackTracker {
    pub fn new(policy: OverwritePolicy) -> Self {
        Self {
            policy,
            skip: false,
        }
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    /// Process one item. Extraction runs iff the marker is absent or the
    /// overwrite policy says the item is stale. The marker is created or
    /// touched only after a successful extraction; a failed extraction
    /// leaves marker state exactly as it was so the next run retries.
    pub fn process(
        &self,
        request: &UnpackRequest,
        markers: &dyn MarkerStore,
        unarchiver: &dyn Unarchiver,
    ) -> Result<Outcome> {
        if self.skip {
            return Ok(Outcome::SkippedByConfiguration);
        }

        let marker = markers.get(&request.marker_id)?;
        if !self.should_extract(request, marker) {
            return Ok(Outcome::SkippedUpToDate);
        }

        if !request.destination.exists() {
            fs::create_dir_all(&request.destination).map_err(DepackError::Io)?;
        }

        unarchiver.extract(&request.source_file, &request.destination)?;
        markers.touch(&request.marker_id)?;

        Ok(Outcome::Extracted)
    }

    // First matching rule decides, in this order: missing marker, newer
    // source, snapshot overwrite, release overwrite.
    fn should_extract(&self, request: &UnpackRequest, marker: Option<SystemTime>) -> bool {
        let Some(marker_modified) = marker else {
            return true;
        };

        if self.policy.if_newer
            && whole_seconds(request.source_modified) > whole_seconds(marker_modified)
        {
            return true;
        }

        if request.snapshot {
            self.policy.snapshots
        } else {
            self.policy.releases
        }
    }
}

// Filesystems commonly truncate sub-second mtime precision, so both sides
// of a "newer than" comparison are rounded down to whole seconds first.
fn whole_seconds(time: SystemTime) -> i64 {
    FileTime::from_system_time(time).unix_seconds()
}
