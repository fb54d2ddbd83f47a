//! Shared fixtures: an in-memory [`PdfEngine`] and document builders.

#![allow(dead_code)]

use pdftomarkd::{
    Block, ConvertError, Document, DocumentMetadata, ExtractedImage, FontFlags, Line, LoadOptions,
    Page, PdfEngine, Span,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Serves prepared documents keyed by file name and records every load.
#[derive(Default)]
pub struct FakeEngine {
    documents: HashMap<String, Document>,
    loads: Mutex<Vec<(PathBuf, LoadOptions)>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, document: Document) -> Self {
        self.documents.insert(file_name.to_string(), document);
        self
    }

    pub fn loads(&self) -> Vec<(PathBuf, LoadOptions)> {
        self.loads.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.lock().unwrap().len()
    }
}

impl PdfEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Document, ConvertError> {
        self.loads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), *options));

        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut doc = self
            .documents
            .get(&key)
            .cloned()
            .ok_or_else(|| ConvertError::Open {
                path: path.to_path_buf(),
                detail: "not a PDF".into(),
            })?;

        if !options.images {
            for page in &mut doc.pages {
                page.images.clear();
            }
        }
        Ok(doc)
    }
}

/// Write a placeholder file the engine will be asked to open.
pub fn touch_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.7\n").unwrap();
    path
}

pub fn text_block(spans: Vec<Span>) -> Block {
    Block::Text(vec![Line::new(spans)])
}

/// One page: "Hello **World**" as a block, plain text "Hello World".
pub fn hello_document() -> Document {
    let mut page = Page::new(1);
    page.text = "Hello World\n".into();
    page.blocks = vec![text_block(vec![
        Span::plain("Hello "),
        Span::new("World", FontFlags::BOLD),
    ])];
    Document {
        metadata: DocumentMetadata {
            title: Some("Greeting".into()),
            page_count: 1,
            ..Default::default()
        },
        pages: vec![page],
    }
}

/// Two pages, the second carrying two images.
pub fn illustrated_document() -> Document {
    let mut p1 = Page::new(1);
    p1.text = "Intro\n".into();
    p1.blocks = vec![text_block(vec![Span::plain("Intro")])];

    let mut p2 = Page::new(2);
    p2.text = "Figures\n".into();
    p2.blocks = vec![text_block(vec![Span::new("Figures", FontFlags::ITALIC)])];
    p2.images = vec![
        ExtractedImage {
            data: b"first".to_vec(),
            extension: "png".into(),
        },
        ExtractedImage {
            data: b"second".to_vec(),
            extension: "png".into(),
        },
    ];

    Document {
        metadata: DocumentMetadata {
            page_count: 2,
            ..Default::default()
        },
        pages: vec![p1, p2],
    }
}
