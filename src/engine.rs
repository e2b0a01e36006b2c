//! Pdfium binding resolution.
//!
//! The original deployment resolved its rasterisation utility's location
//! once at process start and stashed it in a global. Here the resolved
//! location is an explicit [`EngineConfig`] value that callers construct
//! (usually via [`resolve_library_dir`]) and inject through
//! [`crate::config::CombineConfig`], so the library itself holds no
//! ambient state and tests can point different runs at different engines.
//!
//! Binding is re-established inside each blocking render task rather than
//! cached: `Pdfium` handles are cheap to create and are not `Send`.

use crate::error::Pdf2TiffError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where to look for the pdfium shared library.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Directory containing `libpdfium.so` / `libpdfium.dylib` / `pdfium.dll`.
    /// `None` falls back to the system loader's search path.
    pub library_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Config that searches the environment and conventional directories.
    pub fn from_env() -> Self {
        Self {
            library_dir: resolve_library_dir(),
        }
    }
}

/// Locate a directory containing the pdfium shared library, if any.
///
/// Checks `PDFIUM_LIB_PATH` (a directory, or the library file itself),
/// then conventional install locations. Returns `None` when nothing is
/// found; binding then relies on the system loader.
pub fn resolve_library_dir() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        if !env_path.is_empty() {
            let p = PathBuf::from(&env_path);
            if p.is_file() {
                if let Some(parent) = p.parent() {
                    return Some(parent.to_path_buf());
                }
            }
            if library_present(&p) {
                return Some(p);
            }
            warn!(
                "PDFIUM_LIB_PATH is set but no pdfium library found at '{}'",
                env_path
            );
        }
    }

    for candidate in ["/usr/lib", "/usr/local/lib", "/opt/homebrew/lib", "."] {
        let dir = PathBuf::from(candidate);
        if library_present(&dir) {
            return Some(dir);
        }
    }

    None
}

fn library_present(dir: &Path) -> bool {
    dir.join(Pdfium::pdfium_platform_library_name()).exists()
}

/// Bind to pdfium using the injected location hint.
pub(crate) fn bind(config: &EngineConfig) -> Result<Pdfium, Pdf2TiffError> {
    let bindings = match &config.library_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Pdf2TiffError::EngineUnavailable(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

/// Log pdfium availability to aid deployment diagnostics.
///
/// Called once at binary startup; a failed probe is a warning, not an
/// error, since the first real render reports the binding failure with
/// full remediation hints.
pub fn probe(config: &EngineConfig) -> bool {
    match bind(config) {
        Ok(_) => {
            match &config.library_dir {
                Some(dir) => info!("pdfium detected in '{}'", dir.display()),
                None => info!("pdfium detected via system loader"),
            }
            true
        }
        Err(e) => {
            warn!("pdfium not available: {e}");
            false
        }
    }
}
