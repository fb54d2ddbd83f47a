//! Group positioned text runs into lines and blocks.
//!
//! pdfium reports page content as a flat list of objects in content-stream
//! order. Text objects become [`TextRun`]s; this module folds them into the
//! block → line → span tree the Markdown writer walks.
//!
//! Coordinates are PDF user space (origin bottom-left, y grows upward).

use super::model::{Block, FontFlags, Line, Span};

/// Vertical tolerance for "same baseline", as a fraction of line height.
const SAME_LINE_TOLERANCE: f32 = 0.3;
/// Horizontal gap, as a fraction of run height, that reads as a word break.
const WORD_GAP: f32 = 0.15;

/// One text object with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub flags: FontFlags,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl TextRun {
    fn height(&self) -> f32 {
        (self.top - self.bottom).max(1.0)
    }
}

/// A page object in content-stream order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text(TextRun),
    /// Non-text object (image, path, form). Ends the current block.
    Other,
}

struct OpenLine {
    spans: Vec<Span>,
    bottom: f32,
    top: f32,
    right: f32,
}

impl OpenLine {
    fn height(&self) -> f32 {
        (self.top - self.bottom).max(1.0)
    }

    fn ends_with_whitespace(&self) -> bool {
        self.spans
            .last()
            .and_then(|s| s.text.chars().last())
            .is_some_and(char::is_whitespace)
    }
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    lines: Vec<Line>,
    line: Option<OpenLine>,
}

impl BlockBuilder {
    fn push(&mut self, run: TextRun) {
        if run.text.is_empty() {
            return;
        }

        let Some(current) = self.line.as_mut() else {
            self.open_line(run);
            return;
        };

        let tolerance = SAME_LINE_TOLERANCE * current.height().max(run.height());
        if (run.bottom - current.bottom).abs() <= tolerance {
            let run_height = run.height();
            let gap = run.left - current.right;
            let mut text = run.text;
            if gap > WORD_GAP * run_height
                && !current.ends_with_whitespace()
                && !text.starts_with(char::is_whitespace)
            {
                text.insert(0, ' ');
            }
            current.spans.push(Span::new(text, run.flags));
            current.right = current.right.max(run.right);
            current.top = current.top.max(run.top);
            current.bottom = current.bottom.min(run.bottom);
            return;
        }

        // Text moving upward means a new column or a new region.
        let moved_up = run.bottom > current.top;
        let gap = current.bottom - run.top;
        let new_block = moved_up || gap > current.height();

        self.close_line();
        if new_block {
            self.close_block();
        }
        self.open_line(run);
    }

    fn open_line(&mut self, run: TextRun) {
        self.line = Some(OpenLine {
            spans: vec![Span::new(run.text, run.flags)],
            bottom: run.bottom,
            top: run.top,
            right: run.right,
        });
    }

    fn close_line(&mut self) {
        if let Some(line) = self.line.take() {
            self.lines.push(Line::new(line.spans));
        }
    }

    fn close_block(&mut self) {
        self.close_line();
        if !self.lines.is_empty() {
            self.blocks
                .push(Block::Text(std::mem::take(&mut self.lines)));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_block();
        self.blocks
    }
}

/// Fold page items into blocks, preserving content-stream order.
pub fn group_runs(items: impl IntoIterator<Item = PageItem>) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for item in items {
        match item {
            PageItem::Text(run) => builder.push(run),
            PageItem::Other => {
                builder.close_block();
                builder.blocks.push(Block::Other);
            }
        }
    }
    builder.finish()
}
