//! Pipeline stages for PDF-to-TIFF combination.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets the encode
//! stage run without a pdfium library present.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode
//! (paths)   (pdfium)   (multi-frame TIFF)
//! ```
//!
//! 1. [`input`]  — collect, validate, and sort the source paths
//! 2. [`render`] — rasterise each file's pages at the requested DPI; runs
//!    in `spawn_blocking` because pdfium is not async-safe
//! 3. [`encode`] — write every accumulated frame into one TIFF with a
//!    uniform compression scheme and per-frame resolution tags

pub mod encode;
pub mod input;
pub mod render;
