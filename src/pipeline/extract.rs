//! PDF engine seam: turn a file on disk into an owned [`Document`].
//!
//! [`PdfEngine`] is the only place that talks to a PDF library. The
//! production implementation, [`PdfiumEngine`], wraps `pdfium-render`;
//! tests substitute an in-memory engine.
//!
//! pdfium is blocking and keeps per-thread state, so callers run
//! [`PdfEngine::load`] inside `tokio::task::spawn_blocking`.

use super::images::encode_image;
use super::layout::{group_runs, PageItem, TextRun};
use super::model::{Document, ExtractedImage, FontFlags, Page};
use crate::error::ConvertError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// What the caller needs from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Build the block/line/span tree (formatted extraction).
    pub styled: bool,
    /// Decode embedded images.
    pub images: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            styled: true,
            images: false,
        }
    }
}

/// A PDF parsing backend.
///
/// Implementations open the file, copy out everything `options` asks for,
/// and release the native handle before returning — on success and on error.
pub trait PdfEngine: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str {
        "pdf-engine"
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Document, ConvertError>;
}

/// [`PdfEngine`] backed by the pdfium C++ library.
///
/// The library is located through, in order: `PDFIUM_LIB_PATH`, the current
/// directory, and the system library search path.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumEngine;

impl PdfiumEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PdfEngine for PdfiumEngine {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Document, ConvertError> {
        let pdfium = bind_pdfium()?;

        let document = pdfium.load_pdf_from_file(path, None).map_err(|e| {
            let detail = format!("{:?}", e);
            if detail.contains("Password") || detail.contains("password") {
                ConvertError::Open {
                    path: path.to_path_buf(),
                    detail: "document is encrypted and requires a password".to_string(),
                }
            } else {
                ConvertError::Open {
                    path: path.to_path_buf(),
                    detail,
                }
            }
        })?;

        let mut metadata = read_metadata(&document);
        let mut pages = Vec::new();

        for (idx, page) in document.pages().iter().enumerate() {
            let number = idx + 1;
            pages.push(read_page(path, number, &page, options)?);
        }

        metadata.page_count = pages.len();
        info!("PDF loaded: {} pages from {}", pages.len(), path.display());

        Ok(Document { metadata, pages })
    }
}

fn bind_pdfium() -> Result<Pdfium, ConvertError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(lib) if !lib.is_empty() => Pdfium::bind_to_library(&lib),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| ConvertError::EngineUnavailable(e.to_string()))?;

    Ok(Pdfium::new(bindings))
}

fn read_metadata(document: &PdfDocument) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: 0,
    }
}

fn read_page(
    path: &Path,
    number: usize,
    page: &PdfPage,
    options: &LoadOptions,
) -> Result<Page, ConvertError> {
    let extract_err = |detail: String| ConvertError::Extract {
        path: path.to_path_buf(),
        page: number,
        detail,
    };

    let mut out = Page::new(number);

    if !options.styled {
        out.text = page
            .text()
            .map_err(|e| extract_err(format!("{:?}", e)))?
            .all();
    }

    if !options.styled && !options.images {
        return Ok(out);
    }

    let mut collector = ObjectCollector {
        options,
        items: Vec::new(),
        images: Vec::new(),
    };
    for object in page.objects().iter() {
        collector.visit(&object).map_err(extract_err)?;
    }
    out.images = collector.images;
    let items = collector.items;

    if options.styled {
        out.blocks = group_runs(items);
    }

    debug!(
        "Page {}: {} blocks, {} images",
        number,
        out.blocks.len(),
        out.images.len()
    );

    Ok(out)
}

/// Walks page objects in content-stream order, descending into form
/// XObjects so text and images drawn through a form are not lost.
struct ObjectCollector<'o> {
    options: &'o LoadOptions,
    items: Vec<PageItem>,
    images: Vec<ExtractedImage>,
}

impl ObjectCollector<'_> {
    fn visit(&mut self, object: &PdfPageObject) -> Result<(), String> {
        if let Some(text_object) = object.as_text_object() {
            if !self.options.styled {
                return Ok(());
            }
            let bounds = text_object.bounds().map_err(|e| format!("{:?}", e))?;
            self.items.push(PageItem::Text(TextRun {
                text: text_object.text(),
                flags: font_flags(&text_object.font()),
                left: bounds.left().value,
                right: bounds.right().value,
                bottom: bounds.bottom().value,
                top: bounds.top().value,
            }));
        } else if let Some(image_object) = object.as_image_object() {
            self.items.push(PageItem::Other);
            if !self.options.images {
                return Ok(());
            }
            let ordinal = self.images.len() + 1;
            let raw = image_object
                .get_raw_image()
                .map_err(|e| format!("image {} could not be decoded: {:?}", ordinal, e))?;
            let encoded = encode_image(&raw)
                .map_err(|e| format!("image {} could not be encoded: {}", ordinal, e))?;
            self.images.push(encoded);
        } else if let Some(form) = object.as_x_object_form_object() {
            for child in form.iter() {
                self.visit(&child)?;
            }
        }
        Ok(())
    }
}

/// Font properties relevant to emphasis, independent of the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontTraits {
    pub name: String,
    /// CSS-style weight (100–900) when the engine reports one.
    pub weight: Option<u32>,
    pub italic: bool,
    pub bold_reinforced: bool,
    pub serif: bool,
    pub fixed_pitch: bool,
}

/// Map font properties onto span flag bits.
///
/// Many producers leave the descriptor flags empty and only encode style in
/// the base font name (`Helvetica-BoldOblique`), so the name is consulted
/// as well.
pub fn flags_for(traits: &FontTraits) -> FontFlags {
    let name = traits.name.to_ascii_lowercase();
    let mut flags = FontFlags::NONE;

    flags.set(
        FontFlags::BOLD,
        traits.weight.is_some_and(|w| w >= 700)
            || traits.bold_reinforced
            || name.contains("bold")
            || name.contains("black")
            || name.contains("heavy"),
    );
    flags.set(
        FontFlags::ITALIC,
        traits.italic || name.contains("italic") || name.contains("oblique"),
    );
    flags.set(FontFlags::SERIF, traits.serif);
    flags.set(FontFlags::MONOSPACE, traits.fixed_pitch);
    flags
}

fn font_flags(font: &PdfFont) -> FontFlags {
    let weight = match font.weight() {
        Ok(PdfFontWeight::Weight100) => Some(100),
        Ok(PdfFontWeight::Weight200) => Some(200),
        Ok(PdfFontWeight::Weight300) => Some(300),
        Ok(PdfFontWeight::Weight400Normal) => Some(400),
        Ok(PdfFontWeight::Weight500) => Some(500),
        Ok(PdfFontWeight::Weight600) => Some(600),
        Ok(PdfFontWeight::Weight700Bold) => Some(700),
        Ok(PdfFontWeight::Weight800) => Some(800),
        Ok(PdfFontWeight::Weight900) => Some(900),
        Ok(PdfFontWeight::Custom(w)) => Some(w),
        Err(_) => None,
    };

    flags_for(&FontTraits {
        name: font.name(),
        weight,
        italic: font.is_italic(),
        bold_reinforced: font.is_bold_reenforced(),
        serif: font.is_serif(),
        fixed_pitch: font.is_fixed_pitch(),
    })
}
