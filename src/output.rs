//! Result types and output-path resolution.

use crate::error::ConvertError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Document-level metadata read from the PDF info dictionary.
///
/// Empty strings are normalised to `None` by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
}

/// The result of converting one PDF.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// Complete Markdown document.
    pub markdown: String,
    pub metadata: DocumentMetadata,
    /// Where the Markdown was written, when a destination was given.
    pub output_path: Option<PathBuf>,
    /// Image files written next to the Markdown, in emission order.
    pub images: Vec<PathBuf>,
}

/// Compute the Markdown path for `input` given the user's `-o` value.
///
/// * `output` with a suffix, or exactly one input → treated as a file
///   (a missing suffix becomes `.md`).
/// * otherwise → treated as a directory (`output` or the current
///   directory) holding `{stem}.md`.
///
/// Parent directories are created as needed.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    input_count: usize,
) -> Result<PathBuf, ConvertError> {
    match output {
        Some(candidate) if candidate.extension().is_some() || input_count == 1 => {
            let file = if candidate.extension().is_some() {
                candidate.to_path_buf()
            } else {
                candidate.with_extension("md")
            };
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| ConvertError::write(parent, e))?;
            }
            Ok(file)
        }
        _ => {
            let dir = output.unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir).map_err(|e| ConvertError::write(dir, e))?;
            Ok(dir.join(markdown_file_name(input)))
        }
    }
}

/// `{stem}.md` for a given input path.
pub fn markdown_file_name(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".md");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_name_keeps_dotted_stem() {
        assert_eq!(
            markdown_file_name(Path::new("/docs/report.v2.pdf")),
            PathBuf::from("report.v2.md")
        );
        assert_eq!(markdown_file_name(Path::new("a.pdf")), PathBuf::from("a.md"));
    }

    #[test]
    fn no_output_uses_current_directory() {
        let p = resolve_output_path(Path::new("some/dir/a.pdf"), None, 1).unwrap();
        assert_eq!(p, PathBuf::from("./a.md"));
    }

    #[test]
    fn explicit_file_for_single_input() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested/result.md");
        let p = resolve_output_path(Path::new("a.pdf"), Some(out.as_path()), 1).unwrap();
        assert_eq!(p, out);
        assert!(tmp.path().join("nested").is_dir());
    }

    #[test]
    fn suffixless_output_for_single_input_gets_md() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("result");
        let p = resolve_output_path(Path::new("a.pdf"), Some(out.as_path()), 1).unwrap();
        assert_eq!(p, tmp.path().join("result.md"));
    }

    #[test]
    fn directory_for_multiple_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outdir");
        let a = resolve_output_path(Path::new("a.pdf"), Some(out.as_path()), 2).unwrap();
        let b = resolve_output_path(Path::new("x/b.pdf"), Some(out.as_path()), 2).unwrap();
        assert_eq!(a, out.join("a.md"));
        assert_eq!(b, out.join("b.md"));
        assert!(out.is_dir());
    }
}
