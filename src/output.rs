//! Result and statistics types returned by the `combine*` functions.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceResult {
    /// The input file, as resolved and sorted.
    pub path: PathBuf,
    /// Pages contributed to the artifact. Zero when `error` is set.
    pub pages: usize,
    /// Present when the file was skipped under
    /// [`crate::config::FailurePolicy::SkipFailed`].
    pub error: Option<SourceError>,
}

/// Timing and size statistics for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineStats {
    /// Input files after resolution and sorting.
    pub total_sources: usize,
    /// Files that contributed at least one frame.
    pub converted_sources: usize,
    /// Files skipped because of a recorded [`SourceError`].
    pub failed_sources: usize,
    /// Frames written to the artifact.
    pub pages_written: usize,
    /// Size of the artifact on disk.
    pub output_bytes: u64,
    /// Wall-clock time spent in pdfium.
    pub render_duration_ms: u64,
    /// Wall-clock time spent encoding and writing the TIFF.
    pub encode_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Full report of a successful (possibly partial) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineOutput {
    /// Final location of the artifact.
    pub output_path: PathBuf,
    /// Per-file outcomes, in output frame order.
    pub sources: Vec<SourceResult>,
    /// Run statistics.
    pub stats: CombineStats,
}

impl CombineOutput {
    /// True when at least one file was skipped.
    pub fn is_partial(&self) -> bool {
        self.stats.failed_sources > 0
    }

    /// Iterate over the errors of skipped files.
    pub fn source_errors(&self) -> impl Iterator<Item = &SourceError> {
        self.sources.iter().filter_map(|s| s.error.as_ref())
    }
}
