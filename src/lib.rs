//! # pdf2tiff
//!
//! Combine one or more PDF documents into a single multi-page TIFF.
//!
//! ## Why this crate?
//!
//! Document-archive and fax-style workflows expect one artifact per
//! submission: every page of every PDF, rasterised at a known resolution,
//! stacked into a single compressed TIFF. This crate does exactly that and
//! nothing else — rasterisation is delegated to pdfium via the
//! `pdfium-render` crate, multi-frame encoding to the `tiff` encoder.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input   collect paths (explicit list or directory scan),
//!  │             validate %PDF magic, sort lexicographically
//!  ├─ 2. Render  rasterise every page at the requested DPI via pdfium
//!  │             (CPU-bound, spawn_blocking, strictly sequential)
//!  └─ 3. Encode  one multi-frame TIFF, uniform compression, every frame
//!                tagged with the requested DPI; atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2tiff::{combine, CombineConfig};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CombineConfig::builder().dpi(150).build()?;
//!     let inputs = vec![PathBuf::from("b.pdf"), PathBuf::from("a.pdf")];
//!     // Frames come out in sorted order: a.pdf's pages, then b.pdf's.
//!     let output = combine(&inputs, "combined.tiff", &config).await?;
//!     eprintln!("{} pages written", output.stats.pages_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Ordering guarantee
//!
//! Output frame order is (lexicographically sorted input path, then
//! intra-file page order) and is identical across re-runs with the same
//! inputs, whatever order the caller supplied them in.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tiff` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2tiff = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    parse_dpi, resolve_dpi, CombineConfig, CombineConfigBuilder, FailurePolicy, TiffCompression,
    DEFAULT_DPI, MAX_DPI, MIN_DPI,
};
pub use convert::{combine, combine_dir, combine_dir_sync, combine_sync};
pub use engine::{resolve_library_dir, EngineConfig};
pub use error::{Pdf2TiffError, SourceError};
pub use output::{CombineOutput, CombineStats, SourceResult};
pub use progress::{CombineProgressCallback, ProgressCallback};
