//! CLI binary for pdf2tiff.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `CombineConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2tiff::{
    combine, combine_dir, engine, resolve_dpi, CombineConfig, CombineProgressCallback,
    EngineConfig, FailurePolicy, ProgressCallback, TiffCompression, DEFAULT_DPI,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tick per input file, with a log
/// line per processed file above the bar.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Combining");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl CombineProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_sources: usize) {
        self.bar.set_length(total_sources as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_sources} PDF file(s)…"))
        ));
    }

    fn on_source_start(&self, _index: usize, _total: usize, path: &Path) {
        self.bar
            .set_message(path.file_name().unwrap_or_default().to_string_lossy().to_string());
    }

    fn on_source_done(&self, index: usize, total: usize, path: &Path, pages: usize) {
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}  {}",
            green("✓"),
            index + 1,
            total,
            path.file_name().unwrap_or_default().to_string_lossy(),
            dim(&format!("{pages} page(s)")),
        ));
        self.bar.inc(1);
    }

    fn on_source_error(&self, index: usize, total: usize, path: &Path, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}  {}",
            red("✗"),
            index + 1,
            total,
            path.file_name().unwrap_or_default().to_string_lossy(),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, pages_written: usize, failed_sources: usize) {
        self.bar.finish_and_clear();

        if failed_sources == 0 {
            eprintln!(
                "{} {} page(s) collected",
                green("✔"),
                bold(&pages_written.to_string())
            );
        } else {
            eprintln!(
                "{} {} page(s) collected  ({} file(s) skipped)",
                cyan("⚠"),
                bold(&pages_written.to_string()),
                red(&failed_sources.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Combine specific files (frames ordered by sorted filename)
  pdf2tiff a.pdf b.pdf -o combined.tiff

  # Combine every PDF in a folder
  pdf2tiff ./pdf_files -o combined.tiff

  # Higher resolution, LZW compression
  pdf2tiff --dpi 300 --compression lzw scans/ -o scans.tiff

  # Unattended batch: skip files that fail instead of aborting
  pdf2tiff --keep-going nightly/ -o nightly.tiff

  # Machine-readable run report
  pdf2tiff --json a.pdf b.pdf -o out.tiff > report.json

DPI:
  Accepted range is 72–600. Out-of-range values fall back to the
  default of 200 (a warning is logged); in-range values pass through
  unchanged. Every output frame is tagged with the requested DPI.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Directory containing the pdfium shared library
                      (or the library file itself)
  PDF2TIFF_DPI        Default for --dpi
  PDF2TIFF_OUTPUT     Default for --output

SETUP:
  pdf2tiff renders pages with pdfium. Install libpdfium from
  https://github.com/bblanchon/pdfium-binaries and either place it on
  the system loader path or set PDFIUM_LIB_PATH.
"#;

/// Combine PDF files into a single multi-page TIFF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tiff",
    version,
    about = "Combine PDF files into a single multi-page TIFF",
    long_about = "Rasterise every page of one or more PDF files at a configurable DPI and \
write them into a single multi-page compressed TIFF. Inputs may be explicit file paths or \
one directory to scan; frames are ordered by sorted filename, then page number.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to combine, or a single directory to scan for *.pdf.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output TIFF path.
    #[arg(short, long, env = "PDF2TIFF_OUTPUT", default_value = "combined.tiff")]
    output: PathBuf,

    /// Rasterisation DPI (72–600; out-of-range falls back to 200).
    #[arg(long, env = "PDF2TIFF_DPI", default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Frame compression scheme.
    #[arg(long, env = "PDF2TIFF_COMPRESSION", value_enum, default_value = "deflate")]
    compression: CompressionArg,

    /// Skip files that fail instead of aborting the whole batch.
    #[arg(short = 'k', long, env = "PDF2TIFF_KEEP_GOING")]
    keep_going: bool,

    /// Directory containing the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Print the run report as JSON to stdout.
    #[arg(long, env = "PDF2TIFF_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2TIFF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TIFF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TIFF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
    Packbits,
}

impl From<CompressionArg> for TiffCompression {
    fn from(v: CompressionArg) -> Self {
        match v {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::Deflate,
            CompressionArg::Packbits => TiffCompression::Packbits,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve the rasterisation engine once, up front ──────────────────
    let engine_config = match cli.pdfium_lib_path.clone() {
        Some(dir) => EngineConfig {
            library_dir: Some(dir),
        },
        None => EngineConfig::from_env(),
    };
    engine::probe(&engine_config);

    // ── DPI resolution (out-of-range falls back, with a visible warning) ─
    let dpi = resolve_dpi(cli.dpi);
    if dpi != cli.dpi && !cli.quiet {
        eprintln!(
            "{} DPI {} is outside 72–600; using default {}",
            cyan("⚠"),
            cli.dpi,
            dpi
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let policy = if cli.keep_going {
        FailurePolicy::SkipFailed
    } else {
        FailurePolicy::FailFast
    };

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn CombineProgressCallback>)
    } else {
        None
    };

    let mut builder = CombineConfig::builder()
        .dpi(dpi)
        .compression(cli.compression.into())
        .on_source_error(policy)
        .engine(engine_config);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    // A single directory argument means "scan this folder"; anything else
    // is an explicit file list.
    let output = if cli.inputs.len() == 1 && cli.inputs[0].is_dir() {
        combine_dir(&cli.inputs[0], &cli.output, &config).await
    } else {
        combine(&cli.inputs, &cli.output, &config).await
    }
    .context("Conversion failed")?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise run report")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} page(s) from {}/{} file(s)  →  {}",
            if output.stats.failed_sources == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.pages_written,
            output.stats.converted_sources,
            output.stats.total_sources,
            bold(&output.output_path.display().to_string()),
        );
        eprintln!(
            "   {}  {}  {}",
            dim(&format!(
                "{:.2} MB",
                output.stats.output_bytes as f64 / (1024.0 * 1024.0)
            )),
            dim(&format!("{} DPI", config.dpi)),
            dim(&format!("{}ms total", output.stats.total_duration_ms)),
        );
        for err in output.source_errors() {
            eprintln!("   {} {}", red("✗"), err);
        }
    }

    Ok(())
}
