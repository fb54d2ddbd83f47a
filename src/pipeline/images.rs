//! Embedded-image handling: encode decoded bitmaps and write them to disk.
//!
//! pdfium hands back images as decoded `DynamicImage`s, so the original
//! stream bytes are not available. Every image is re-encoded as PNG, which
//! is lossless for both photographic and line-art content.

use super::model::ExtractedImage;
use crate::error::ConvertError;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Encode a decoded page image as PNG.
pub fn encode_image(img: &DynamicImage) -> Result<ExtractedImage, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );

    Ok(ExtractedImage {
        data: buf,
        extension: "png".to_string(),
    })
}

/// `image_page{page}_{index}.{ext}`, both numbers 1-indexed.
pub fn image_file_name(page: usize, index: usize, extension: &str) -> String {
    format!("image_page{page}_{index}.{extension}")
}

/// Directory that receives image files for a given Markdown destination:
/// its parent when it has a file suffix, otherwise the destination itself.
pub fn image_dir(destination: &Path) -> PathBuf {
    if destination.extension().is_some() {
        match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    } else {
        destination.to_path_buf()
    }
}

/// Write one image into `dir`, overwriting any existing file.
pub fn write_image(
    dir: &Path,
    page: usize,
    index: usize,
    image: &ExtractedImage,
) -> Result<PathBuf, ConvertError> {
    let path = dir.join(image_file_name(page, index, &image.extension));
    std::fs::write(&path, &image.data).map_err(|e| ConvertError::write(&path, e))?;
    debug!("Wrote image {}", path.display());
    Ok(path)
}
