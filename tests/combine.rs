//! Integration tests for pdf2tiff.
//!
//! Tests that rasterise real pages need a pdfium shared library at
//! runtime, so they are gated behind the `PDF2TIFF_E2E` environment
//! variable and skip with a message otherwise (point `PDFIUM_LIB_PATH`
//! at your pdfium copy if it is not on the loader path):
//!
//!   PDF2TIFF_E2E=1 cargo test --test combine -- --nocapture
//!
//! Everything else — ordering, policies, TIFF structure — runs
//! unconditionally against generated fixtures.

use pdf2tiff::{
    combine, combine_dir, CombineConfig, EngineConfig, FailurePolicy, Pdf2TiffError,
};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiff::decoder::Decoder;
use tiff::tags::Tag;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless PDF2TIFF_E2E is set (pdfium required).
macro_rules! e2e_skip_unless_ready {
    () => {
        if std::env::var("PDF2TIFF_E2E").is_err() {
            println!("SKIP — set PDF2TIFF_E2E=1 to run pdfium-backed tests");
            return;
        }
    };
}

/// Build a minimal but well-formed PDF with `pages` empty US-Letter pages.
///
/// Pages carry no /Contents stream; pdfium renders them as blank rasters
/// at the MediaBox size (612 × 792 pt), which is all these tests need.
fn minimal_pdf(pages: usize) -> Vec<u8> {
    assert!(pages >= 1);

    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 3 + i)).collect();
    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages
        ),
    ];
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string());
    }

    let mut buf: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = buf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in &offsets {
        xref.push_str(&format!("{off:010} 00000 n \n"));
    }
    buf.extend_from_slice(xref.as_bytes());
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    buf
}

fn write_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, minimal_pdf(pages)).unwrap();
    p
}

fn e2e_config(dpi: u32, policy: FailurePolicy) -> CombineConfig {
    CombineConfig::builder()
        .dpi(dpi)
        .on_source_error(policy)
        .engine(EngineConfig::from_env())
        .build()
        .unwrap()
}

/// Decode a TIFF from disk: (frame count, per-frame dpi, per-frame dims).
fn inspect_tiff(path: &Path) -> (usize, Vec<u32>, Vec<(u32, u32)>) {
    let bytes = fs::read(path).expect("artifact exists");
    let mut dec = Decoder::new(Cursor::new(bytes)).expect("valid TIFF");

    let mut count = 0;
    let mut dpis = Vec::new();
    let mut dims = Vec::new();
    loop {
        count += 1;
        dims.push(dec.dimensions().expect("frame dimensions"));
        match dec.get_tag(Tag::XResolution).expect("XResolution tag") {
            tiff::decoder::ifd::Value::Rational(n, d) => dpis.push(n / d),
            other => panic!("unexpected XResolution value: {other:?}"),
        }
        dec.read_image().expect("frame decodes");
        if !dec.more_images() {
            break;
        }
        dec.next_image().expect("advance to next frame");
    }
    (count, dpis, dims)
}

// ── Policy and ordering tests (no pdfium) ────────────────────────────────────

#[tokio::test]
async fn empty_input_list_reports_failure_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");

    let err = combine(&[], &out, &CombineConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2TiffError::NoSourcesProvided));
    assert!(!out.exists());
}

#[tokio::test]
async fn fail_fast_surfaces_the_offending_filename() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");
    let fake = dir.path().join("mislabelled.pdf");
    fs::write(&fake, b"PNG\x89 pretending to be a pdf").unwrap();

    let err = combine(&[fake], &out, &CombineConfig::default())
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("mislabelled.pdf"),
        "error must name the file, got: {err}"
    );
    assert!(!out.exists());
}

#[tokio::test]
async fn skip_policy_with_all_bad_inputs_yields_empty_result_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");
    let a = dir.path().join("a.pdf");
    fs::write(&a, b"not a pdf").unwrap();
    let b = dir.path().join("b.pdf"); // never created

    let config = CombineConfig::builder()
        .on_source_error(FailurePolicy::SkipFailed)
        .build()
        .unwrap();

    let err = combine(&[a, b], &out, &config).await.unwrap_err();
    match err {
        Pdf2TiffError::NoPagesExtracted { sources } => assert_eq!(sources, 2),
        other => panic!("expected NoPagesExtracted, got {other:?}"),
    }
    assert!(!out.exists());
}

#[tokio::test]
async fn directory_without_pdfs_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), b"nothing here").unwrap();
    let out = dir.path().join("combined.tiff");

    let err = combine_dir(dir.path(), &out, &CombineConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2TiffError::NoSourcesFound { .. }));
}

// ── Rasterising tests (pdfium required, env-gated) ───────────────────────────

#[tokio::test]
async fn frames_follow_sorted_filename_then_page_order() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");

    // Supplied out of order on purpose: b first, then a.
    let b = write_pdf(dir.path(), "b.pdf", 1);
    let a = write_pdf(dir.path(), "a.pdf", 2);

    let output = combine(&[b, a], &out, &e2e_config(150, FailurePolicy::FailFast))
        .await
        .expect("combine should succeed");

    assert_eq!(output.stats.pages_written, 3);
    assert_eq!(output.sources.len(), 2);
    // Report order matches processing order: a.pdf (2 pages) before b.pdf.
    assert!(output.sources[0].path.ends_with("a.pdf"));
    assert_eq!(output.sources[0].pages, 2);
    assert!(output.sources[1].path.ends_with("b.pdf"));
    assert_eq!(output.sources[1].pages, 1);

    let (frames, dpis, dims) = inspect_tiff(&out);
    assert_eq!(frames, 3);
    assert_eq!(dpis, vec![150, 150, 150]);
    // 612 × 792 pt at 150 DPI.
    for (w, h) in dims {
        assert_eq!((w, h), (1275, 1650));
    }
}

#[tokio::test]
async fn single_multi_page_pdf_keeps_page_order_and_count() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");
    let doc = write_pdf(dir.path(), "report.pdf", 4);

    let output = combine(&[doc], &out, &e2e_config(96, FailurePolicy::FailFast))
        .await
        .expect("combine should succeed");

    assert_eq!(output.stats.pages_written, 4);
    let (frames, dpis, _) = inspect_tiff(&out);
    assert_eq!(frames, 4);
    assert_eq!(dpis, vec![96; 4]);
}

#[tokio::test]
async fn corrupt_file_aborts_batch_under_fail_fast() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");

    let good = write_pdf(dir.path(), "a.pdf", 1);
    // Valid magic so validation passes; pdfium chokes on the body.
    let bad = dir.path().join("z.pdf");
    fs::write(&bad, b"%PDF-1.4\nthis is not a pdf body\n").unwrap();

    let err = combine(
        &[good, bad],
        &out,
        &e2e_config(200, FailurePolicy::FailFast),
    )
    .await
    .unwrap_err();

    match err {
        Pdf2TiffError::SourceFailed { path, .. } => assert!(path.ends_with("z.pdf")),
        other => panic!("expected SourceFailed, got {other:?}"),
    }
    assert!(!out.exists(), "fail-fast must not leave an artifact");
}

#[tokio::test]
async fn corrupt_file_is_skipped_under_keep_going() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("combined.tiff");

    let good = write_pdf(dir.path(), "a.pdf", 2);
    let bad = dir.path().join("z.pdf");
    fs::write(&bad, b"%PDF-1.4\nthis is not a pdf body\n").unwrap();

    let output = combine(
        &[bad, good],
        &out,
        &e2e_config(200, FailurePolicy::SkipFailed),
    )
    .await
    .expect("partial success expected");

    assert!(output.is_partial());
    assert_eq!(output.stats.pages_written, 2);
    assert_eq!(output.stats.failed_sources, 1);
    assert_eq!(output.source_errors().count(), 1);

    let (frames, _, _) = inspect_tiff(&out);
    assert_eq!(frames, 2);
}

#[tokio::test]
async fn directory_scan_combines_sorted_contents() {
    e2e_skip_unless_ready!();
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let out = dst.path().join("combined.tiff");

    write_pdf(src.path(), "2_second.pdf", 1);
    write_pdf(src.path(), "1_first.pdf", 1);
    fs::write(src.path().join("skipme.txt"), b"x").unwrap();

    let output = combine_dir(src.path(), &out, &e2e_config(200, FailurePolicy::SkipFailed))
        .await
        .expect("combine_dir should succeed");

    assert_eq!(output.stats.total_sources, 2);
    assert_eq!(output.stats.pages_written, 2);
    assert!(output.sources[0].path.ends_with("1_first.pdf"));
    assert!(output.sources[1].path.ends_with("2_second.pdf"));
}

#[tokio::test]
async fn rerun_yields_identical_frame_count_order_and_dpi() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2);
    let b = write_pdf(dir.path(), "b.pdf", 1);

    let config = e2e_config(300, FailurePolicy::FailFast);
    let out1 = dir.path().join("run1.tiff");
    let out2 = dir.path().join("run2.tiff");

    // Different argument order on the second run.
    combine(&[a.clone(), b.clone()], &out1, &config).await.unwrap();
    combine(&[b, a], &out2, &config).await.unwrap();

    let (frames1, dpis1, dims1) = inspect_tiff(&out1);
    let (frames2, dpis2, dims2) = inspect_tiff(&out2);
    assert_eq!(frames1, frames2);
    assert_eq!(dpis1, dpis2);
    assert_eq!(dims1, dims2);
    assert_eq!(dpis1, vec![300, 300, 300]);
}

#[tokio::test]
async fn requested_dpi_is_tagged_not_source_resolution() {
    e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    let doc = write_pdf(dir.path(), "doc.pdf", 1);

    // Same document, two requested DPIs: the tag must follow the request.
    for dpi in [72, 400] {
        let out = dir.path().join(format!("at_{dpi}.tiff"));
        combine(&[doc.clone()], &out, &e2e_config(dpi, FailurePolicy::FailFast))
            .await
            .unwrap();
        let (_, dpis, _) = inspect_tiff(&out);
        assert_eq!(dpis, vec![dpi]);
    }
}
