//! Configuration types for PDF-to-Markdown conversion.
//!
//! Single-file and batch behaviour is controlled through
//! [`ConversionConfig`]; watch mode wraps one in a [`WatchConfig`]. Both are
//! built through builders so callers set only what they care about.

use crate::error::ConvertError;
use crate::pipeline::extract::{LoadOptions, PdfEngine, PdfiumEngine};
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftomarkd::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .preserve_formatting(false)
///     .extract_images(false)
///     .build()
///     .unwrap();
/// assert!(!config.preserve_formatting);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Render bold/italic spans as Markdown emphasis and split text into
    /// paragraphs by block. When `false` the page's plain text is used
    /// verbatim. Default: true.
    pub preserve_formatting: bool,

    /// Write embedded images next to the Markdown file and reference them.
    /// Only applies when a destination path is given. Default: true.
    pub extract_images: bool,

    /// Pre-constructed PDF engine. When `None`, [`PdfiumEngine`] is used.
    pub engine: Option<Arc<dyn PdfEngine>>,

    /// Receiver for per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            preserve_formatting: true,
            extract_images: true,
            engine: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("preserve_formatting", &self.preserve_formatting)
            .field("extract_images", &self.extract_images)
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The engine to load documents with.
    pub fn engine(&self) -> Arc<dyn PdfEngine> {
        match self.engine {
            Some(ref engine) => Arc::clone(engine),
            None => Arc::new(PdfiumEngine::new()),
        }
    }

    /// Engine options for a conversion with or without a destination.
    pub fn load_options(&self, has_destination: bool) -> LoadOptions {
        LoadOptions {
            styled: self.preserve_formatting,
            images: has_destination && self.extract_images,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn preserve_formatting(mut self, v: bool) -> Self {
        self.config.preserve_formatting = v;
        self
    }

    pub fn extract_images(mut self, v: bool) -> Self {
        self.config.extract_images = v;
        self
    }

    pub fn engine(mut self, engine: Arc<dyn PdfEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        Ok(self.config)
    }
}

// ── Watch mode ───────────────────────────────────────────────────────────

/// Default pause between directory listings.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default wait before converting a newly noticed file.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Configuration for [`crate::watch::watch`].
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Conversion settings applied to every file.
    pub conversion: ConversionConfig,

    /// Where Markdown files go. Default: `<folder>/converted`.
    pub output_dir: Option<PathBuf>,

    /// Pause between polling cycles. Default: 2 s.
    pub poll_interval: Duration,

    /// Wait after first noticing a file, before checking its size and
    /// converting it. Lets the writer finish. Default: 1 s.
    pub settle_delay: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            conversion: ConversionConfig::default(),
            output_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl WatchConfig {
    pub fn builder() -> WatchConfigBuilder {
        WatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`WatchConfig`].
#[derive(Debug)]
pub struct WatchConfigBuilder {
    config: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn conversion(mut self, conversion: ConversionConfig) -> Self {
        self.config.conversion = conversion;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<WatchConfig, ConvertError> {
        if self.config.poll_interval.is_zero() {
            return Err(ConvertError::InvalidConfig(
                "Poll interval must be greater than zero".into(),
            ));
        }
        Ok(self.config)
    }
}
