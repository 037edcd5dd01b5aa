//! CLI binary for images2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to `PdfConfig`
//! and prints progress and a summary.

use anyhow::{Context, Result};
use clap::Parser;
use images2pdf::{
    convert_dir_to_pdf, BatchConfirmation, ConversionProgress, ConversionProgressCallback,
    ImageError, PageOrientation, PageSize, PdfConfig, ProgressCallback, DEFAULT_OUTPUT_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
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

/// Terminal progress callback: a live progress bar plus one log line per
/// image.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// The bar length is set by `on_conversion_start` once the batch has
    /// been filtered and counted.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Listing images…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    fn on_image_complete(&self, progress: &ConversionProgress) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            progress.current_label,
            dim(&format!("({}/{})", progress.current, progress.total)),
        ));
        self.bar.set_message(progress.current_label.clone());
        self.bar.inc(1);
    }

    fn on_image_error(&self, progress: &ConversionProgress, error: &ImageError) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = error.to_string();
        let msg = if msg.len() > 80 {
            format!("{}\u{2026}", &msg[..79])
        } else {
            msg
        };

        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            red(&msg),
            dim(&format!("({}/{})", progress.current, progress.total)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total: usize, succeeded: usize) {
        let failed = total.saturating_sub(succeeded);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} images converted successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} images converted  ({} skipped)",
                if succeeded == 0 { red("✘") } else { cyan("⚠") },
                bold(&succeeded.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

/// Plain-text progress for `--no-progress`: one stdout line per image,
/// script-mode style.
struct PlainProgressCallback;

impl ConversionProgressCallback for PlainProgressCallback {
    fn on_conversion_start(&self, total: usize) {
        println!("Converting {total} image(s)...");
    }

    fn on_image_complete(&self, progress: &ConversionProgress) {
        println!(
            "   {} ({}/{})",
            progress.current_label, progress.current, progress.total
        );
    }

    fn on_image_error(&self, progress: &ConversionProgress, error: &ImageError) {
        println!(
            "   skipped: {} ({}/{})",
            error, progress.current, progress.total
        );
    }
}

// ── Large-batch confirmation ─────────────────────────────────────────────────

/// Interactive yes/no gate for batches over the threshold.
struct PromptConfirmation {
    assume_yes: bool,
}

impl BatchConfirmation for PromptConfirmation {
    fn confirm_large_batch(&self, total: usize) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!(
            "You're about to process {total} images. This may take a long time \
             and use significant memory. Continue? [y/N] "
        );
        io::stderr().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

// ── Arguments ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a folder to images-collection.pdf
  images2pdf ./photos

  # Name the output
  images2pdf ./photos holiday.pdf

  # Landscape letter pages at 90% quality
  images2pdf --orientation landscape --page-size letter -q 0.9 ./scans scans.pdf

  # Non-interactive (CI): accept large batches, plain progress lines
  images2pdf --yes --no-progress ./frames frames.pdf

SUPPORTED FORMATS:
  jpg, jpeg, png, gif, bmp, webp, svg

BEHAVIOUR:
  Images are sorted by file name (case-insensitive) before layout, one page
  per image. Files that cannot be decoded are skipped with a warning; the
  rest of the batch still converts. Batches over 1000 images ask for
  confirmation first.
"#;

/// Convert every image in a folder into a single PDF.
#[derive(Parser, Debug)]
#[command(
    name = "images2pdf",
    version,
    about = "Convert every image in a folder into a single multi-page PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the images (flat listing, no recursion).
    folder: PathBuf,

    /// Output PDF file name.
    #[arg(default_value = DEFAULT_OUTPUT_NAME)]
    output: String,

    /// Page margin in millimetres.
    #[arg(long, env = "IMAGES2PDF_MARGIN", default_value_t = 20.0)]
    margin: f32,

    /// Caption font size in points.
    #[arg(long, env = "IMAGES2PDF_FONT_SIZE", default_value_t = 10.0)]
    font_size: f32,

    /// Image re-encode quality (0.1–1.0).
    #[arg(short, long, env = "IMAGES2PDF_QUALITY", default_value_t = 0.8)]
    quality: f32,

    /// Page orientation.
    #[arg(long, env = "IMAGES2PDF_ORIENTATION", value_enum, default_value = "portrait")]
    orientation: OrientationArg,

    /// Page size.
    #[arg(long, env = "IMAGES2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Answer yes to the large-batch confirmation.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Plain per-image stdout lines instead of a progress bar.
    #[arg(long, env = "IMAGES2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "IMAGES2PDF_QUIET")]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMAGES2PDF_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for PageOrientation {
    fn from(v: OrientationArg) -> Self {
        match v {
            OrientationArg::Portrait => PageOrientation::Portrait,
            OrientationArg::Landscape => PageOrientation::Landscape,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PageSizeArg {
    A4,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_bar = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_bar {
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

    if !cli.quiet {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Converting images in {} → {}",
                cli.folder.display(),
                cli.output
            ))
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_bar {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else if !cli.quiet {
        Some(Arc::new(PlainProgressCallback))
    } else {
        None
    };

    let mut builder = PdfConfig::builder()
        .margin_mm(cli.margin)
        .font_size(cli.font_size)
        .quality(cli.quality)
        .orientation(cli.orientation.clone().into())
        .page_size(cli.page_size.clone().into())
        .confirmation(Arc::new(PromptConfirmation {
            assume_yes: cli.yes,
        }));
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let stats = convert_dir_to_pdf(&cli.folder, &cli.output, &config)
        .await
        .context("Conversion failed")?;

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        let mb = stats.output_bytes as f64 / 1024.0 / 1024.0;
        eprintln!(
            "{}  {} images  →  {}  {}",
            green("✔"),
            stats.processed_images,
            bold(&cli.output),
            dim(&format!("({mb:.2} MB, {}ms)", stats.total_duration_ms)),
        );
        if stats.failed_images > 0 {
            eprintln!("   {} image(s) skipped", red(&stats.failed_images.to_string()));
        }
        if stats.filtered_out > 0 {
            eprintln!(
                "   {} unsupported file(s) filtered out",
                dim(&stats.filtered_out.to_string())
            );
        }
    }

    Ok(())
}
