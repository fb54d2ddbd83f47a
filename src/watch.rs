//! Folder watcher: poll a directory and convert PDFs as they appear.
//!
//! The watcher remembers every PDF it has seen for the lifetime of the call.
//! On start it marks everything already present and converts only those
//! without a matching `{stem}.md` in the output directory. After that each
//! new file gets a short settle delay and is converted once it is non-empty;
//! a file still empty after the delay is looked at again next cycle.

use crate::config::{ConversionConfig, WatchConfig};
use crate::convert::convert_to_file;
use crate::error::ConvertError;
use crate::output::markdown_file_name;
use crate::pipeline::input::has_pdf_extension;
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Watch `folder` until `shutdown` resolves.
///
/// Returns [`ConvertError::InvalidFolder`] when `folder` is not a directory
/// and [`ConvertError::Write`] when the output directory cannot be created.
/// Conversion failures are logged and reported through the progress
/// callback; they never stop the watcher.
pub async fn watch<F>(folder: &Path, config: &WatchConfig, shutdown: F) -> Result<(), ConvertError>
where
    F: Future<Output = ()>,
{
    if !folder.is_dir() {
        return Err(ConvertError::InvalidFolder {
            path: folder.to_path_buf(),
        });
    }

    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| folder.join("converted"));
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| ConvertError::write(&output_dir, e))?;

    let conversion = &config.conversion;
    let callback = conversion.progress_callback.clone();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    info!(
        "Watching {} (output: {})",
        folder.display(),
        output_dir.display()
    );

    // ── Initial sweep ────────────────────────────────────────────────────
    for pdf in list_pdfs(folder).await {
        seen.insert(pdf.clone());
        let target = output_dir.join(markdown_file_name(&pdf));
        if target.exists() {
            debug!("Already converted: {}", pdf.display());
            continue;
        }
        convert_into(&pdf, &target, conversion).await;
    }

    if let Some(ref cb) = callback {
        cb.on_watch_start(folder, &output_dir);
    }

    // ── Poll loop ────────────────────────────────────────────────────────
    tokio::pin!(shutdown);
    'watch: loop {
        let new_files: Vec<PathBuf> = list_pdfs(folder)
            .await
            .into_iter()
            .filter(|p| !seen.contains(p))
            .collect();

        for pdf in new_files {
            tokio::select! {
                _ = &mut shutdown => break 'watch,
                _ = tokio::time::sleep(config.settle_delay) => {}
            }

            if !is_ready(&pdf).await {
                debug!("Not ready yet: {}", pdf.display());
                continue;
            }

            seen.insert(pdf.clone());
            info!("New PDF detected: {}", pdf.display());
            if let Some(ref cb) = callback {
                cb.on_new_file(&pdf);
            }
            let target = output_dir.join(markdown_file_name(&pdf));
            convert_into(&pdf, &target, conversion).await;
        }

        tokio::select! {
            _ = &mut shutdown => break 'watch,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
    }

    info!("Stopped watching {}", folder.display());
    if let Some(ref cb) = callback {
        cb.on_watch_stop(folder);
    }
    Ok(())
}

/// Convert one file, logging and reporting instead of returning errors.
async fn convert_into(pdf: &Path, target: &Path, config: &ConversionConfig) {
    let callback = config.progress_callback.as_ref();
    if let Some(cb) = callback {
        cb.on_file_start(pdf, Some(target));
    }

    match convert_to_file(pdf, target, config).await {
        Ok(out) => {
            if let Some(cb) = callback {
                cb.on_file_complete(pdf, Some(target), out.markdown.len());
            }
        }
        Err(e) => {
            debug!("Conversion of {} failed: {}", pdf.display(), e);
            if let Some(cb) = callback {
                cb.on_file_error(pdf, &e);
            }
        }
    }
}

/// Regular files directly inside `folder` with a `.pdf` extension, sorted.
async fn list_pdfs(folder: &Path) -> Vec<PathBuf> {
    let mut entries = match tokio::fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut pdfs = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                if is_file && has_pdf_extension(&path) {
                    pdfs.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Error while listing {}: {}", folder.display(), e);
                break;
            }
        }
    }
    pdfs.sort();
    pdfs
}

/// A file is ready once it still exists and is non-empty.
async fn is_ready(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.len() > 0)
        .unwrap_or(false)
}

/// A future that resolves on Ctrl+C, for callers without their own
/// shutdown signal.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
