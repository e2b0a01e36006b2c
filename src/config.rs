//! Configuration types for PDF-to-TIFF combination.
//!
//! All conversion behaviour is controlled through [`CombineConfig`], built
//! via its [`CombineConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across entry points (CLI flags, a host
//! application, tests) and to log exactly what a run was asked to do.
//!
//! # DPI resolution rule
//!
//! The accepted range is 72–600. Anything outside the range — and any
//! unparsable string — resolves to the default of 200 rather than being
//! clamped to the nearest bound. In-range values pass through unchanged.
//! This mirrors the behaviour of the system this crate replaces and is
//! pinned by tests.

use crate::engine::EngineConfig;
use crate::error::Pdf2TiffError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default rasterisation resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;
/// Lowest accepted DPI.
pub const MIN_DPI: u32 = 72;
/// Highest accepted DPI.
pub const MAX_DPI: u32 = 600;

/// Resolve a requested DPI: in-range passes through, out-of-range falls
/// back to [`DEFAULT_DPI`].
pub fn resolve_dpi(requested: u32) -> u32 {
    if (MIN_DPI..=MAX_DPI).contains(&requested) {
        requested
    } else {
        DEFAULT_DPI
    }
}

/// Resolve a DPI given as text (e.g. a form field or CLI argument).
/// Non-numeric input falls back to [`DEFAULT_DPI`].
pub fn parse_dpi(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .map(resolve_dpi)
        .unwrap_or(DEFAULT_DPI)
}

/// Compression scheme applied uniformly to every frame of the output.
///
/// The original surface also offered JPEG-in-TIFF; the `tiff` encoder does
/// not support it, so the choice here is the lossless set. Deflate is the
/// default: rendered page rasters are mostly white and compress extremely
/// well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    /// Uncompressed frames.
    None,
    /// LZW.
    Lzw,
    /// Deflate (zlib). (default)
    #[default]
    Deflate,
    /// PackBits run-length encoding.
    Packbits,
}

impl fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TiffCompression::None => "none",
            TiffCompression::Lzw => "lzw",
            TiffCompression::Deflate => "deflate",
            TiffCompression::Packbits => "packbits",
        };
        f.write_str(s)
    }
}

/// What to do when a single input file fails to rasterise.
///
/// The system this crate replaces did both, depending on the call site:
/// its interactive path aborted the whole batch, its batch scripts logged
/// and continued. Here the policy is one explicit knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the batch on the first failing file; the error names the
    /// file. Recommended for interactive use. (default)
    #[default]
    FailFast,
    /// Log the failure, record it in the output report, and continue with
    /// the remaining files. Recommended for unattended batch runs.
    SkipFailed,
}

/// Configuration for one PDF-to-TIFF combination run.
///
/// Built via [`CombineConfig::builder()`] or [`CombineConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2tiff::{CombineConfig, FailurePolicy, TiffCompression};
///
/// let config = CombineConfig::builder()
///     .dpi(150)
///     .compression(TiffCompression::Lzw)
///     .on_source_error(FailurePolicy::SkipFailed)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CombineConfig {
    /// Rasterisation resolution applied to every page, and the value
    /// written into every frame's X/Y resolution tag. Range 72–600,
    /// default 200. The tag always carries this requested DPI, never any
    /// resolution metadata from the source PDF.
    pub dpi: u32,

    /// Compression scheme for every frame. Default: deflate.
    pub compression: TiffCompression,

    /// Per-file failure policy. Default: fail-fast.
    pub on_source_error: FailurePolicy,

    /// Where to find the pdfium shared library.
    pub engine: EngineConfig,

    /// Optional per-file progress callback.
    pub progress: Option<ProgressCallback>,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            compression: TiffCompression::default(),
            on_source_error: FailurePolicy::default(),
            engine: EngineConfig::default(),
            progress: None,
        }
    }
}

impl fmt::Debug for CombineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombineConfig")
            .field("dpi", &self.dpi)
            .field("compression", &self.compression)
            .field("on_source_error", &self.on_source_error)
            .field("engine", &self.engine)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl CombineConfig {
    /// Create a new builder for `CombineConfig`.
    pub fn builder() -> CombineConfigBuilder {
        CombineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CombineConfig`].
pub struct CombineConfigBuilder {
    config: CombineConfig,
}

impl CombineConfigBuilder {
    /// Set the rasterisation DPI. Out-of-range values resolve to the
    /// default per [`resolve_dpi`].
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = resolve_dpi(dpi);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.config.compression = compression;
        self
    }

    pub fn on_source_error(mut self, policy: FailurePolicy) -> Self {
        self.config.on_source_error = policy;
        self
    }

    /// Inject the pdfium location hint. See [`crate::engine`].
    pub fn library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.engine.library_dir = Some(dir.into());
        self
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CombineConfig, Pdf2TiffError> {
        let c = &self.config;
        // The dpi setter already normalises; guard against direct struct
        // mutation between builder calls.
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(Pdf2TiffError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_dpi_passes_through() {
        assert_eq!(resolve_dpi(72), 72);
        assert_eq!(resolve_dpi(150), 150);
        assert_eq!(resolve_dpi(600), 600);
    }

    #[test]
    fn out_of_range_dpi_falls_back_to_default() {
        assert_eq!(resolve_dpi(71), DEFAULT_DPI);
        assert_eq!(resolve_dpi(601), DEFAULT_DPI);
        assert_eq!(resolve_dpi(0), DEFAULT_DPI);
        assert_eq!(resolve_dpi(u32::MAX), DEFAULT_DPI);
    }

    #[test]
    fn textual_dpi_resolution() {
        assert_eq!(parse_dpi("300"), 300);
        assert_eq!(parse_dpi(" 150 "), 150);
        assert_eq!(parse_dpi("9000"), DEFAULT_DPI);
        assert_eq!(parse_dpi("abc"), DEFAULT_DPI);
        assert_eq!(parse_dpi(""), DEFAULT_DPI);
        assert_eq!(parse_dpi("-150"), DEFAULT_DPI);
    }

    #[test]
    fn builder_normalises_dpi() {
        let c = CombineConfig::builder().dpi(1200).build().unwrap();
        assert_eq!(c.dpi, DEFAULT_DPI);

        let c = CombineConfig::builder().dpi(96).build().unwrap();
        assert_eq!(c.dpi, 96);
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = CombineConfig::default();
        assert_eq!(c.dpi, 200);
        assert_eq!(c.compression, TiffCompression::Deflate);
        assert_eq!(c.on_source_error, FailurePolicy::FailFast);
        assert!(c.engine.library_dir.is_none());
    }

    #[test]
    fn compression_display_names() {
        assert_eq!(TiffCompression::Deflate.to_string(), "deflate");
        assert_eq!(TiffCompression::Packbits.to_string(), "packbits");
    }
}
