//! Batch conversion: validate, place and convert a list of inputs.
//!
//! Files are processed one after another in argument order. A failure on
//! one file is recorded and the batch moves on to the next.

use crate::config::ConversionConfig;
use crate::convert::convert_to_file;
use crate::error::{ConvertError, FailureKind};
use crate::output::resolve_output_path;
use crate::pipeline::input::validate_input;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A file that converted successfully.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub markdown_len: usize,
    pub images: usize,
}

/// A file that was rejected or failed.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub input: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of [`convert_batch`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<FileResult>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    /// Process exit status for this batch: `1` when any file failed or when
    /// nothing was converted, `0` otherwise.
    pub fn exit_code(&self) -> u8 {
        if !self.failed.is_empty() || self.succeeded.is_empty() {
            1
        } else {
            0
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Convert every path in `inputs`.
///
/// `output` follows the command-line rules: a path with a suffix, or any
/// path when there is exactly one input, names the Markdown file; otherwise
/// it is a directory (default: the current directory) receiving
/// `{stem}.md` for each input.
pub async fn convert_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config: &ConversionConfig,
) -> BatchReport {
    let mut report = BatchReport::default();
    let callback = config.progress_callback.as_ref();

    for input in inputs {
        match convert_one(input, output, inputs.len(), config).await {
            Ok(result) => {
                if let Some(cb) = callback {
                    cb.on_file_complete(input, Some(result.output.as_path()), result.markdown_len);
                }
                report.succeeded.push(result);
            }
            Err(e) => {
                debug!("Conversion of {} failed: {}", input.display(), e);
                if let Some(cb) = callback {
                    cb.on_file_error(input, &e);
                }
                report.failed.push(FileFailure {
                    input: input.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch finished: {} converted, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    report
}

async fn convert_one(
    input: &Path,
    output: Option<&Path>,
    input_count: usize,
    config: &ConversionConfig,
) -> Result<FileResult, ConvertError> {
    validate_input(input)?;
    let destination = resolve_output_path(input, output, input_count)?;

    if let Some(cb) = config.progress_callback.as_ref() {
        cb.on_file_start(input, Some(destination.as_path()));
    }

    let converted = convert_to_file(input, &destination, config).await?;
    Ok(FileResult {
        input: input.to_path_buf(),
        output: converted.output_path.unwrap_or(destination),
        markdown_len: converted.markdown.len(),
        images: converted.images.len(),
    })
}
