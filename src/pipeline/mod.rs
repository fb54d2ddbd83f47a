//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! ```text
//! input ──▶ extract ──▶ layout ──▶ markdown
//! (checks)  (pdfium)   (lines)    (fragments)
//!              └──▶ images (PNG files)
//! ```
//!
//! 1. [`input`]    — reject missing files and non-PDF names
//! 2. [`extract`]  — the [`extract::PdfEngine`] seam and its pdfium backend
//! 3. [`layout`]   — fold positioned text runs into blocks and lines
//! 4. [`model`]    — the owned document tree the engine returns
//! 5. [`markdown`] — emphasis, paragraphs and the metadata header
//! 6. [`images`]   — PNG encoding, naming and writing of embedded images

pub mod extract;
pub mod images;
pub mod input;
pub mod layout;
pub mod markdown;
pub mod model;
