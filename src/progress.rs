//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch runner and the folder watcher work through files.
//! The callback is the reporting sink: the library itself only emits
//! `tracing` events and never prints.
//!
//! # Example
//!
//! ```rust
//! use pdftomarkd::{ConversionConfig, ConversionProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     converted: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, input: &Path, _output: Option<&Path>, markdown_len: usize) {
//!         self.converted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} → {} bytes", input.display(), markdown_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { converted: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ConvertError;
use std::path::Path;
use std::sync::Arc;

/// Called by the batch runner and the watcher as files are processed.
///
/// All methods default to no-ops so implementations override only what
/// they display.
pub trait ConversionProgressCallback: Send + Sync {
    /// A file is about to be converted.
    fn on_file_start(&self, input: &Path, output: Option<&Path>) {
        let _ = (input, output);
    }

    /// A file converted successfully.
    ///
    /// * `markdown_len` — byte length of the produced Markdown
    fn on_file_complete(&self, input: &Path, output: Option<&Path>, markdown_len: usize) {
        let _ = (input, output, markdown_len);
    }

    /// A file was rejected or failed to convert.
    fn on_file_error(&self, input: &Path, error: &ConvertError) {
        let _ = (input, error);
    }

    /// The watcher finished its initial sweep and started polling.
    fn on_watch_start(&self, folder: &Path, output_dir: &Path) {
        let _ = (folder, output_dir);
    }

    /// The watcher noticed a file it has not seen before.
    fn on_new_file(&self, input: &Path) {
        let _ = input;
    }

    /// The watcher stopped after a shutdown request.
    fn on_watch_stop(&self, folder: &Path) {
        let _ = folder;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
