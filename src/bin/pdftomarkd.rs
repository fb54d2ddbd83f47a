//! CLI binary for pdftomarkd.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `WatchConfig` and reports per-file results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdftomarkd::{
    convert_batch, watch, BatchReport, ConversionConfig, ConversionProgressCallback, ConvertError,
    ProgressCallback, WatchConfig,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
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

/// Terminal reporter: a spinner naming the file in flight plus one status
/// line per file. With `quiet` only failures are printed.
struct CliProgressCallback {
    /// Present unless progress display is disabled.
    spinner: Option<ProgressBar>,
    quiet: bool,
    verbose: bool,
}

impl CliProgressCallback {
    fn new(show_spinner: bool, quiet: bool, verbose: bool) -> Arc<Self> {
        let spinner = show_spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Starting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            spinner,
            quiet,
            verbose,
        })
    }

    /// Print a line above the spinner, or straight to stderr without one.
    fn line(&self, msg: String) {
        match self.spinner {
            Some(ref bar) => bar.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn finish(&self) {
        if let Some(ref bar) = self.spinner {
            bar.finish_and_clear();
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_file_start(&self, input: &Path, output: Option<&Path>) {
        if let Some(ref bar) = self.spinner {
            bar.set_prefix("Converting");
            bar.set_message(input.display().to_string());
        }
        if self.verbose && !self.quiet {
            let target = output
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            self.line(format!(
                "{} Converting: {} → {}",
                cyan("◆"),
                input.display(),
                target
            ));
        }
    }

    fn on_file_complete(&self, input: &Path, output: Option<&Path>, markdown_len: usize) {
        if self.quiet {
            return;
        }
        let target = output
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        self.line(format!(
            "  {} {}  →  {}  {}",
            green("✓"),
            input.display(),
            bold(&target),
            dim(&format!("{markdown_len} chars")),
        ));
    }

    fn on_file_error(&self, input: &Path, error: &ConvertError) {
        self.line(format!("  {} {}  {}", red("✗"), input.display(), red(&error.to_string())));
    }

    fn on_watch_start(&self, folder: &Path, output_dir: &Path) {
        if let Some(ref bar) = self.spinner {
            bar.set_prefix("Watching");
            bar.set_message(folder.display().to_string());
        }
        if !self.quiet {
            self.line(format!(
                "{} {}  {}",
                cyan("◆"),
                bold(&format!("Watching {} for new PDFs", folder.display())),
                dim(&format!("(output: {}; Ctrl+C to stop)", output_dir.display())),
            ));
        }
    }

    fn on_new_file(&self, input: &Path) {
        if !self.quiet {
            self.line(format!("{} New PDF detected: {}", cyan("◆"), input.display()));
        }
    }

    fn on_watch_stop(&self, folder: &Path) {
        self.finish();
        if !self.quiet {
            eprintln!("{} Stopped watching {}", green("✔"), folder.display());
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one file (writes document.md next to the working directory)
  pdftomarkd document.pdf

  # Choose the output file
  pdftomarkd document.pdf -o notes/document.md

  # Convert several files into a directory
  pdftomarkd a.pdf b.pdf c.pdf -o converted/

  # Plain text, no emphasis, no images
  pdftomarkd --simple --no-images document.pdf

  # Watch a folder; results go to inbox/converted/
  pdftomarkd --watch inbox

  # Machine-readable batch report
  pdftomarkd --json a.pdf b.pdf > report.json

OUTPUT RULES:
  -o with a file suffix, or a single input      → that file (".md" added if missing)
  -o without a suffix and several inputs        → directory holding {stem}.md
  no -o                                         → {stem}.md in the current directory
  Images are written next to the Markdown as image_page{N}_{M}.png.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise ./ then the system path)
  RUST_LOG                Override the log filter (e.g. pdftomarkd=debug)
  PDFTOMARKD_*            Every flag below also reads an environment variable
"#;

/// Convert PDF files to Markdown, preserving emphasis and extracting images.
#[derive(Parser, Debug)]
#[command(
    name = "pdftomarkd",
    version,
    about = "Convert PDF files to Markdown, preserving bold/italic text and images",
    long_about = "Convert PDF files to Markdown from their text layer. Bold and italic runs \
become Markdown emphasis, paragraphs follow the PDF's text blocks, and embedded images are \
saved next to the output. Can also watch a folder and convert PDFs as they arrive.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to convert.
    pdf: Vec<PathBuf>,

    /// Output file or directory.
    #[arg(short, long, env = "PDFTOMARKD_OUTPUT")]
    output: Option<PathBuf>,

    /// Plain text extraction without bold/italic formatting.
    #[arg(long, env = "PDFTOMARKD_SIMPLE")]
    simple: bool,

    /// Do not extract embedded images.
    #[arg(long, env = "PDFTOMARKD_NO_IMAGES")]
    no_images: bool,

    /// Enable DEBUG-level tracing logs and per-file "Converting" lines.
    #[arg(short, long, env = "PDFTOMARKD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTOMARKD_QUIET")]
    quiet: bool,

    /// Watch FOLDER for new PDFs and convert them as they appear.
    #[arg(long, value_name = "FOLDER", env = "PDFTOMARKD_WATCH")]
    watch: Option<PathBuf>,

    /// Watch mode: milliseconds between folder scans.
    #[arg(long, env = "PDFTOMARKD_POLL_INTERVAL_MS", default_value_t = 2000,
          value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,

    /// Watch mode: milliseconds to wait before converting a new file.
    #[arg(long, env = "PDFTOMARKD_SETTLE_MS", default_value_t = 1000)]
    settle_ms: u64,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDFTOMARKD_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFTOMARKD_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.pdf.is_empty() && cli.watch.is_none() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "No PDF files specified (pass one or more PDFs, or --watch FOLDER)",
            )
            .exit();
    }

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are suppressed while the spinner is active;
    // the status lines carry what the user needs.
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

    // ── Build config ─────────────────────────────────────────────────────
    let reporter = CliProgressCallback::new(show_progress, cli.quiet || cli.json, cli.verbose);
    let config = ConversionConfig::builder()
        .preserve_formatting(!cli.simple)
        .extract_images(!cli.no_images)
        .progress_callback(Arc::clone(&reporter) as ProgressCallback)
        .build()
        .context("Invalid conversion settings")?;

    // ── Watch mode ───────────────────────────────────────────────────────
    if let Some(ref folder) = cli.watch {
        let mut builder = WatchConfig::builder()
            .conversion(config)
            .poll_interval(Duration::from_millis(cli.poll_interval_ms))
            .settle_delay(Duration::from_millis(cli.settle_ms));
        if let Some(ref out) = cli.output {
            builder = builder.output_dir(out);
        }
        let watch_config = builder.build().context("Invalid watch settings")?;

        return match watch(folder, &watch_config, pdftomarkd::watch::ctrl_c()).await {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e @ ConvertError::InvalidFolder { .. }) => {
                reporter.finish();
                error!("{}", e);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                reporter.finish();
                Err(e).context("Watch mode failed")
            }
        };
    }

    // ── Batch mode ───────────────────────────────────────────────────────
    let report = convert_batch(&cli.pdf, cli.output.as_deref(), &config).await;
    reporter.finish();

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report);
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn print_summary(report: &BatchReport) {
    let total = report.total();
    let converted = report.succeeded.len();
    let failed = report.failed.len();

    if failed == 0 && converted > 0 {
        eprintln!(
            "{} {} of {} files converted",
            green("✔"),
            bold(&converted.to_string()),
            total
        );
    } else {
        eprintln!(
            "{} {}/{} files converted  ({} failed)",
            if converted == 0 { red("✘") } else { cyan("⚠") },
            bold(&converted.to_string()),
            total,
            red(&failed.to_string()),
        );
    }
}
