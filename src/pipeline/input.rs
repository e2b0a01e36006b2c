//! Input collection: gather, validate, and order the source PDF paths.
//!
//! ## Why sort?
//!
//! Frame order in the artifact is (sorted path, then intra-file page
//! order). Sorting here — not at the call sites — makes the output
//! deterministic and reproducible regardless of upload or argument order,
//! and means every entry point gets the same ordering for free.
//!
//! Validation checks the `%PDF` magic bytes before pdfium ever sees the
//! file, so callers get a meaningful error rather than an opaque engine
//! failure for a mislabelled file.

use crate::error::Pdf2TiffError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True when the path carries a `.pdf` extension (case-insensitive).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Collect every `*.pdf` in `dir`, sorted lexicographically by path.
///
/// Non-PDF entries and subdirectories are ignored; the scan is not
/// recursive.
pub fn collect_from_dir(dir: &Path) -> Result<Vec<PathBuf>, Pdf2TiffError> {
    if !dir.is_dir() {
        return Err(Pdf2TiffError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2TiffError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => Pdf2TiffError::Internal(format!("read_dir '{}': {}", dir.display(), e)),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();

    paths.sort();
    debug!("Found {} PDF file(s) in '{}'", paths.len(), dir.display());
    Ok(paths)
}

/// Sort an explicit input list into processing order.
pub fn sort_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut sorted = inputs.to_vec();
    sorted.sort();
    sorted
}

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_source(path: &Path) -> Result<(), Pdf2TiffError> {
    if !path.exists() {
        return Err(Pdf2TiffError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            match f.read_exact(&mut magic) {
                Ok(()) if &magic == b"%PDF" => Ok(()),
                Ok(()) => Err(Pdf2TiffError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                }),
                // Shorter than 4 bytes cannot be a PDF either.
                Err(_) => Err(Pdf2TiffError::NotAPdf {
                    path: path.to_path_buf(),
                    magic: [0; 4],
                }),
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Pdf2TiffError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(Pdf2TiffError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fake_pdf(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, b"%PDF-1.4\n%fake\n").unwrap();
        p
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("a.pdf")));
        assert!(has_pdf_extension(Path::new("a.PDF")));
        assert!(!has_pdf_extension(Path::new("a.tiff")));
        assert!(!has_pdf_extension(Path::new("pdf")));
        assert!(!has_pdf_extension(Path::new("a.pdf.txt")));
    }

    #[test]
    fn directory_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_fake_pdf(dir.path(), "b.pdf");
        write_fake_pdf(dir.path(), "a.pdf");
        write_fake_pdf(dir.path(), "c.PDF");
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let found = collect_from_dir(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.PDF"]);
    }

    #[test]
    fn scan_of_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let f = write_fake_pdf(dir.path(), "a.pdf");
        assert!(matches!(
            collect_from_dir(&f),
            Err(Pdf2TiffError::NotADirectory { .. })
        ));
    }

    #[test]
    fn explicit_inputs_are_sorted() {
        let inputs = vec![
            PathBuf::from("/tmp/b.pdf"),
            PathBuf::from("/tmp/a.pdf"),
            PathBuf::from("/tmp/a_2.pdf"),
        ];
        let sorted = sort_sources(&inputs);
        assert_eq!(
            sorted,
            vec![
                PathBuf::from("/tmp/a.pdf"),
                PathBuf::from("/tmp/a_2.pdf"),
                PathBuf::from("/tmp/b.pdf"),
            ]
        );
    }

    #[test]
    fn validate_accepts_pdf_magic() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_fake_pdf(dir.path(), "ok.pdf");
        validate_source(&p).unwrap();
    }

    #[test]
    fn validate_rejects_wrong_magic() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("fake.pdf");
        fs::write(&p, b"GIF89a__").unwrap();
        match validate_source(&p) {
            Err(Pdf2TiffError::NotAPdf { magic, .. }) => assert_eq!(&magic, b"GIF8"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("absent.pdf");
        assert!(matches!(
            validate_source(&p),
            Err(Pdf2TiffError::FileNotFound { .. })
        ));
    }

    #[test]
    fn validate_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tiny.pdf");
        fs::write(&p, b"%P").unwrap();
        assert!(matches!(
            validate_source(&p),
            Err(Pdf2TiffError::NotAPdf { .. })
        ));
    }
}
