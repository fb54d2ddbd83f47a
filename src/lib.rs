//! # pdftomarkd
//!
//! Convert PDF documents to Markdown from their embedded text layer.
//!
//! Text is read with its font information so bold and italic runs become
//! Markdown emphasis, paragraphs follow the PDF's own text blocks, and
//! embedded images are written next to the output and linked in place.
//! Nothing is rasterised and no OCR is attempted: scanned pages without a
//! text layer come out empty.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     reject missing files and non-PDF names
//!  ├─ 2. Load      pdfium reads metadata, text runs and images (spawn_blocking)
//!  ├─ 3. Layout    runs → lines → blocks
//!  ├─ 4. Markdown  header, emphasis, one paragraph per block
//!  └─ 5. Output    images + Markdown written next to each other
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftomarkd::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_to_file("report.pdf", "report.md", &config).await?;
//!     eprintln!("{} images written", output.images.len());
//!     Ok(())
//! }
//! ```
//!
//! Watch a folder instead:
//!
//! ```rust,no_run
//! use pdftomarkd::{watch, WatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WatchConfig::builder().build()?;
//!     watch("inbox".as_ref(), &config, pdftomarkd::watch::ctrl_c()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftomarkd` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirement
//!
//! The default engine binds to a pdfium shared library at runtime. It is
//! looked up at `PDFIUM_LIB_PATH`, then next to the working directory,
//! then on the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod watch;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_batch, BatchReport, FileFailure, FileResult};
pub use config::{ConversionConfig, ConversionConfigBuilder, WatchConfig, WatchConfigBuilder};
pub use convert::{convert, convert_sync, convert_to_file};
pub use error::{ConvertError, FailureKind};
pub use output::{resolve_output_path, ConversionOutput, DocumentMetadata};
pub use pipeline::extract::{LoadOptions, PdfEngine, PdfiumEngine};
pub use pipeline::model::{Block, Document, ExtractedImage, FontFlags, Line, Page, Span};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use watch::watch;
