//! Top-level combination entry points.
//!
//! One conceptual operation lives here: read PDFs, rasterise every page,
//! write one multi-frame TIFF. The three historical call sites (upload
//! handler, folder-batch script, configurable script) collapse into
//! [`combine`] and [`combine_dir`], with their behavioural difference —
//! abort-on-first-failure vs. skip-and-continue — expressed as
//! [`crate::config::FailurePolicy`] instead of duplicated code.
//!
//! The artifact write is atomic: the TIFF is encoded into a temp file in
//! the destination directory and renamed into place, so no partial output
//! survives an encode failure and temp state is released on every exit
//! path.

use crate::config::{CombineConfig, FailurePolicy};
use crate::error::{Pdf2TiffError, SourceError};
use crate::output::{CombineOutput, CombineStats, SourceResult};
use crate::pipeline::{encode, input, render};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Combine the given PDF files into one multi-page TIFF at `output_path`.
///
/// Inputs are sorted lexicographically by path before processing, so the
/// frame order is (sorted path, then intra-file page order) regardless of
/// argument order.
///
/// # Errors
/// Fatal per [`Pdf2TiffError`]: empty input list, a failing file under
/// [`FailurePolicy::FailFast`], every file failing under
/// [`FailurePolicy::SkipFailed`], or an encode/write failure. On error no
/// artifact is left at `output_path`.
pub async fn combine(
    inputs: &[PathBuf],
    output_path: impl AsRef<Path>,
    config: &CombineConfig,
) -> Result<CombineOutput, Pdf2TiffError> {
    let total_start = Instant::now();
    let output_path = output_path.as_ref();

    if inputs.is_empty() {
        return Err(Pdf2TiffError::NoSourcesProvided);
    }

    let sorted = input::sort_sources(inputs);
    let total = sorted.len();
    info!(
        "Starting conversion of {} file(s) at {} DPI → '{}'",
        total,
        config.dpi,
        output_path.display()
    );

    if let Some(ref cb) = config.progress {
        cb.on_batch_start(total);
    }

    // ── Rasterise, strictly sequentially ─────────────────────────────────
    let render_start = Instant::now();
    let mut frames: Vec<DynamicImage> = Vec::new();
    let mut sources: Vec<SourceResult> = Vec::new();

    for (index, path) in sorted.iter().enumerate() {
        if let Some(ref cb) = config.progress {
            cb.on_source_start(index, total, path);
        }

        let outcome = match input::validate_source(path) {
            Ok(()) => render::render_file(path, config.dpi, &config.engine).await,
            Err(fatal) => match config.on_source_error {
                FailurePolicy::FailFast => return Err(fatal),
                FailurePolicy::SkipFailed => Err(SourceError::Unreadable {
                    path: path.clone(),
                    detail: unreadable_detail(&fatal),
                }),
            },
        };

        match outcome {
            Ok(pages) => {
                info!("'{}': {} page(s) extracted", path.display(), pages.len());
                if let Some(ref cb) = config.progress {
                    cb.on_source_done(index, total, path, pages.len());
                }
                sources.push(SourceResult {
                    path: path.clone(),
                    pages: pages.len(),
                    error: None,
                });
                frames.extend(pages);
            }
            Err(err) => match config.on_source_error {
                FailurePolicy::FailFast => {
                    return Err(Pdf2TiffError::SourceFailed {
                        path: path.clone(),
                        detail: err.detail().to_string(),
                    });
                }
                FailurePolicy::SkipFailed => {
                    warn!("Skipping '{}': {}", path.display(), err.detail());
                    if let Some(ref cb) = config.progress {
                        cb.on_source_error(index, total, path, err.detail());
                    }
                    sources.push(SourceResult {
                        path: path.clone(),
                        pages: 0,
                        error: Some(err),
                    });
                }
            },
        }
    }
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let pages_written = frames.len();
    if pages_written == 0 {
        return Err(Pdf2TiffError::NoPagesExtracted { sources: total });
    }

    // ── Encode and write atomically ──────────────────────────────────────
    let encode_start = Instant::now();
    write_artifact(frames, output_path, config).await?;
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;

    let output_bytes = tokio::fs::metadata(output_path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);

    let failed_sources = sources.iter().filter(|s| s.error.is_some()).count();
    let stats = CombineStats {
        total_sources: total,
        converted_sources: total - failed_sources,
        failed_sources,
        pages_written,
        output_bytes,
        render_duration_ms,
        encode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Successfully created TIFF with {} page(s) ({:.2} MB) in {}ms",
        pages_written,
        output_bytes as f64 / (1024.0 * 1024.0),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress {
        cb.on_batch_complete(pages_written, failed_sources);
    }

    Ok(CombineOutput {
        output_path: output_path.to_path_buf(),
        sources,
        stats,
    })
}

/// Combine every `*.pdf` in `dir` (non-recursive, sorted) into one TIFF.
///
/// This is the folder-batch entry point; it delegates to [`combine`]
/// after the scan.
pub async fn combine_dir(
    dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CombineConfig,
) -> Result<CombineOutput, Pdf2TiffError> {
    let dir = dir.as_ref();
    let found = input::collect_from_dir(dir)?;
    if found.is_empty() {
        return Err(Pdf2TiffError::NoSourcesFound {
            dir: dir.to_path_buf(),
        });
    }
    combine(&found, output_path, config).await
}

/// Synchronous wrapper around [`combine`].
///
/// Creates a temporary tokio runtime internally.
pub fn combine_sync(
    inputs: &[PathBuf],
    output_path: impl AsRef<Path>,
    config: &CombineConfig,
) -> Result<CombineOutput, Pdf2TiffError> {
    runtime()?.block_on(combine(inputs, output_path, config))
}

/// Synchronous wrapper around [`combine_dir`].
pub fn combine_dir_sync(
    dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CombineConfig,
) -> Result<CombineOutput, Pdf2TiffError> {
    runtime()?.block_on(combine_dir(dir, output_path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn runtime() -> Result<tokio::runtime::Runtime, Pdf2TiffError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TiffError::Internal(format!("Failed to create tokio runtime: {e}")))
}

/// Encode `frames` into a temp file next to `output_path`, then rename.
async fn write_artifact(
    frames: Vec<DynamicImage>,
    output_path: &Path,
    config: &CombineConfig,
) -> Result<(), Pdf2TiffError> {
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| Pdf2TiffError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    let dpi = config.dpi;
    let compression = config.compression;
    let out = output_path.to_path_buf();

    // Encoding is CPU-bound; keep it off the async executor like rendering.
    let tmp = tokio::task::spawn_blocking(move || {
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .map_err(|e| Pdf2TiffError::OutputWriteFailed {
                path: out.clone(),
                source: e,
            })?;
        encode::write_frames(tmp.as_file_mut(), &frames, dpi, compression).map_err(|e| {
            Pdf2TiffError::EncodeFailed {
                path: out.clone(),
                detail: e.to_string(),
            }
        })?;
        Ok::<_, Pdf2TiffError>(tmp)
    })
    .await
    .map_err(|e| Pdf2TiffError::Internal(format!("Encode task panicked: {e}")))??;

    tmp.persist(output_path)
        .map_err(|e| Pdf2TiffError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Short per-file detail for a validation failure recorded under the skip
/// policy (the path is carried separately by [`SourceError`]).
fn unreadable_detail(err: &Pdf2TiffError) -> String {
    match err {
        Pdf2TiffError::FileNotFound { .. } => "file not found".to_string(),
        Pdf2TiffError::PermissionDenied { .. } => "permission denied".to_string(),
        Pdf2TiffError::NotAPdf { magic, .. } => format!("not a PDF (first bytes {magic:?})"),
        other => other.to_string(),
    }
}
