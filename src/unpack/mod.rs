pub mod archive;
pub mod markers;
pub mod report;
pub mod tracker;

pub use archive::{ArchiveExtractor, Unarchiver};
pub use markers::{FileMarkerStore, MarkerStore};
pub use report::{ItemReport, ReportWriter, RunReport};
pub use tracker::{Outcome, OverwritePolicy, UnpackRequest, UnpackTracker};
