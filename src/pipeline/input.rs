//! Input validation: reject paths that cannot be converted before the engine
//! is ever touched.

use crate::error::ConvertError;
use std::path::Path;
use tracing::debug;

/// `true` when `path` carries a `.pdf` extension (any case).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Check that `path` exists and looks like a PDF by name.
pub fn validate_input(path: &Path) -> Result<(), ConvertError> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !has_pdf_extension(path) {
        return Err(ConvertError::NotAPdf {
            path: path.to_path_buf(),
        });
    }

    debug!("Validated input: {}", path.display());
    Ok(())
}
