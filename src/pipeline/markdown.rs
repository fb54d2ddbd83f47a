//! Markdown assembly: metadata header, paragraphs, image references.
//!
//! [`MarkdownDocument`] is an append-only list of fragments. Each `push_*`
//! method appends exactly one fragment terminated by a blank line, and
//! [`MarkdownDocument::finish`] concatenates them.

use super::model::{Line, Span};
use crate::output::DocumentMetadata;

/// Horizontal rule emitted after the metadata header.
pub const SEPARATOR: &str = "---\n\n";

/// Append-only Markdown builder.
#[derive(Debug, Default)]
pub struct MarkdownDocument {
    fragments: Vec<String>,
}

impl MarkdownDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title heading, author and subject lines for present fields, then the
    /// separator (always).
    pub fn push_header(&mut self, meta: &DocumentMetadata) {
        if let Some(title) = non_empty(&meta.title) {
            self.fragments.push(format!("# {title}\n\n"));
        }
        if let Some(author) = non_empty(&meta.author) {
            self.fragments.push(format!("**Author:** {author}\n\n"));
        }
        if let Some(subject) = non_empty(&meta.subject) {
            self.fragments.push(format!("**Subject:** {subject}\n\n"));
        }
        self.fragments.push(SEPARATOR.to_string());
    }

    /// Append a styled text block; blocks without spans emit nothing.
    pub fn push_block(&mut self, lines: &[Line]) {
        if let Some(paragraph) = format_block(lines) {
            self.fragments.push(format!("{paragraph}\n\n"));
        }
    }

    /// Append a page's plain text verbatim unless it is blank.
    pub fn push_plain_text(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.fragments.push(format!("{text}\n\n"));
        }
    }

    /// Append `![name](name)`.
    pub fn push_image_ref(&mut self, file_name: &str) {
        self.fragments
            .push(format!("![{file_name}]({file_name})\n\n"));
    }

    pub fn finish(self) -> String {
        self.fragments.concat()
    }
}

/// Wrap a span's text in emphasis markers according to its flags.
///
/// Bold is applied first, italic wraps the result, so a bold-italic span
/// renders as `***text***`.
pub fn format_span(span: &Span) -> String {
    let mut text = span.text.clone();
    if span.flags.is_bold() {
        text = format!("**{text}**");
    }
    if span.flags.is_italic() {
        text = format!("*{text}*");
    }
    text
}

/// Spans of one line concatenated without a separator.
pub fn format_line(line: &Line) -> Option<String> {
    if line.spans.is_empty() {
        return None;
    }
    Some(line.spans.iter().map(format_span).collect())
}

/// Lines of one block joined with single spaces.
pub fn format_block(lines: &[Line]) -> Option<String> {
    let parts: Vec<String> = lines.iter().filter_map(format_line).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
