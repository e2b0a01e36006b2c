//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn CombineProgressCallback>`] via
//! [`crate::config::CombineConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log file, or a host
//! application's own channel without the library knowing how the host
//! communicates. The trait is `Send + Sync` so a single callback can be
//! shared with the blocking render tasks.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about.

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipeline as it processes each input file.
///
/// Files are processed strictly sequentially, so events for one file never
/// interleave with another's; implementations still must be `Send + Sync`
/// because rendering happens on a blocking worker thread.
pub trait CombineProgressCallback: Send + Sync {
    /// Called once after input resolution, before any file is rendered.
    fn on_batch_start(&self, total_sources: usize) {
        let _ = total_sources;
    }

    /// Called before rasterising a file. `index` is 0-based batch position.
    fn on_source_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called after a file rasterised successfully.
    fn on_source_done(&self, index: usize, total: usize, path: &Path, pages: usize) {
        let _ = (index, total, path, pages);
    }

    /// Called when a file failed and the skip policy is active.
    fn on_source_error(&self, index: usize, total: usize, path: &Path, error: &str) {
        let _ = (index, total, path, error);
    }

    /// Called once after the artifact was written (or the batch failed).
    fn on_batch_complete(&self, pages_written: usize, failed_sources: usize) {
        let _ = (pages_written, failed_sources);
    }
}

/// Convenience alias for the shared callback handle stored in the config.
pub type ProgressCallback = Arc<dyn CombineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        done: AtomicUsize,
    }

    impl CombineProgressCallback for Counting {
        fn on_source_done(&self, _index: usize, _total: usize, _path: &Path, _pages: usize) {
            self.done.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_no_ops() {
        let cb = Counting {
            done: AtomicUsize::new(0),
        };
        cb.on_batch_start(3);
        cb.on_source_start(0, 3, Path::new("a.pdf"));
        cb.on_source_error(1, 3, Path::new("b.pdf"), "boom");
        cb.on_batch_complete(2, 1);
        assert_eq!(cb.done.load(Ordering::SeqCst), 0);

        cb.on_source_done(2, 3, Path::new("c.pdf"), 5);
        assert_eq!(cb.done.load(Ordering::SeqCst), 1);
    }
}
