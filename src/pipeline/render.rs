//! PDF rasterisation: render every page of one file to `DynamicImage`
//! via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a thread
//! designed for blocking operations, so a caller embedding the library in
//! an async host never stalls its executor during CPU-heavy rendering.
//!
//! ## DPI → scale
//!
//! PDF page geometry is expressed in points (1/72 inch). Rendering at
//! `dpi / 72` of the page's point size produces a raster whose pixel
//! density matches the requested DPI exactly, which is also the value
//! written into every frame's resolution tag downstream.

use crate::engine::{self, EngineConfig};
use crate::error::SourceError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Points per inch in PDF page space.
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterise every page of `path` at `dpi`, in page order.
///
/// Failures come back as [`SourceError`] so the caller can apply the
/// configured per-file policy.
pub async fn render_file(
    path: &Path,
    dpi: u32,
    engine: &EngineConfig,
) -> Result<Vec<DynamicImage>, SourceError> {
    let owned = path.to_path_buf();
    let task_path = owned.clone();
    let engine = engine.clone();

    tokio::task::spawn_blocking(move || render_file_blocking(&task_path, dpi, &engine))
        .await
        .map_err(|e| SourceError::RenderFailed {
            path: owned,
            detail: format!("render task panicked: {e}"),
        })?
}

/// Blocking implementation of per-file rendering.
fn render_file_blocking(
    path: &Path,
    dpi: u32,
    engine: &EngineConfig,
) -> Result<Vec<DynamicImage>, SourceError> {
    let pdfium = engine::bind(engine).map_err(|e| SourceError::RenderFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let document =
        pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| SourceError::RenderFailed {
                path: path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    debug!("'{}': {} page(s)", path.display(), total);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);

    let mut frames = Vec::with_capacity(total);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| SourceError::RenderFailed {
                    path: path.to_path_buf(),
                    detail: format!("page {}: {e:?}", idx + 1),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered '{}' page {}/{} → {}x{} px",
            path.display(),
            idx + 1,
            total,
            image.width(),
            image.height()
        );
        frames.push(image);
    }

    Ok(frames)
}
