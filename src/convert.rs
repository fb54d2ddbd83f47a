//! Single-document conversion entry points.
//!
//! The pipeline is: load the PDF through the configured engine (which
//! closes its native handle before returning), append the metadata header,
//! walk pages in order emitting one fragment per paragraph and image, and
//! finally write the Markdown when a destination was given.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{markdown_file_name, ConversionOutput};
use crate::pipeline::images::{image_dir, image_file_name, write_image};
use crate::pipeline::markdown::MarkdownDocument;
use crate::pipeline::model::{Block, Document};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF to Markdown without writing anything to disk.
///
/// Images are not extracted because there is nowhere to put them.
pub async fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    spawn_conversion(input.as_ref(), None, config).await
}

/// Convert a PDF and write the Markdown (and its images) to `output`.
///
/// `output` with a file suffix is the Markdown path and images go to its
/// parent directory. Without a suffix it is a directory: it receives the
/// images and `{input stem}.md`.
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    spawn_conversion(input.as_ref(), Some(output.as_ref()), config).await
}

/// Blocking form of [`convert`] / [`convert_to_file`].
///
/// Runs on the calling thread; do not call from inside an async task.
pub fn convert_sync(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    convert_blocking(input.as_ref(), output, config)
}

/// Run the blocking pipeline on Tokio's blocking pool.
async fn spawn_conversion(
    input: &Path,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let input = input.to_path_buf();
    let output = output.map(Path::to_path_buf);
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_blocking(&input, output.as_deref(), &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Where a conversion writes its output.
struct Target {
    markdown: PathBuf,
    image_dir: PathBuf,
}

impl Target {
    fn resolve(input: &Path, destination: &Path) -> Self {
        if destination.extension().is_some() {
            Target {
                markdown: destination.to_path_buf(),
                image_dir: image_dir(destination),
            }
        } else {
            Target {
                markdown: destination.join(markdown_file_name(input)),
                image_dir: destination.to_path_buf(),
            }
        }
    }
}

fn convert_blocking(
    input: &Path,
    destination: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let start = Instant::now();
    info!("Starting conversion: {}", input.display());

    if !input.exists() {
        return Err(ConvertError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    // ── Step 1: Load ─────────────────────────────────────────────────────
    let engine = config.engine();
    let options = config.load_options(destination.is_some());
    let document = engine.load(input, &options)?;
    debug!(
        "{} returned {} pages for {}",
        engine.name(),
        document.pages.len(),
        input.display()
    );

    // ── Step 2: Prepare output locations ─────────────────────────────────
    let target = destination.map(|d| Target::resolve(input, d));
    if let Some(ref t) = target {
        if options.images {
            std::fs::create_dir_all(&t.image_dir)
                .map_err(|e| ConvertError::write(&t.image_dir, e))?;
        }
    }

    // ── Step 3: Assemble ─────────────────────────────────────────────────
    let images_into = target
        .as_ref()
        .filter(|_| options.images)
        .map(|t| t.image_dir.as_path());
    let (markdown, images) = assemble(&document, config.preserve_formatting, images_into)?;

    // ── Step 4: Write ────────────────────────────────────────────────────
    let output_path = match target {
        Some(t) => {
            write_markdown(&t.markdown, &markdown)?;
            Some(t.markdown)
        }
        None => None,
    };

    info!(
        "Conversion complete: {} ({} pages, {} images, {} bytes) in {}ms",
        input.display(),
        document.pages.len(),
        images.len(),
        markdown.len(),
        start.elapsed().as_millis()
    );

    Ok(ConversionOutput {
        markdown,
        metadata: document.metadata,
        output_path,
        images,
    })
}

/// Build the Markdown text, writing images into `image_dir` as they are
/// referenced.
fn assemble(
    document: &Document,
    preserve_formatting: bool,
    image_dir: Option<&Path>,
) -> Result<(String, Vec<PathBuf>), ConvertError> {
    let mut md = MarkdownDocument::new();
    let mut written = Vec::new();

    md.push_header(&document.metadata);

    for page in &document.pages {
        if preserve_formatting {
            for block in &page.blocks {
                if let Block::Text(lines) = block {
                    md.push_block(lines);
                }
            }
        } else {
            md.push_plain_text(&page.text);
        }

        if let Some(dir) = image_dir {
            for (idx, image) in page.images.iter().enumerate() {
                let ordinal = idx + 1;
                written.push(write_image(dir, page.number, ordinal, image)?);
                md.push_image_ref(&image_file_name(page.number, ordinal, &image.extension));
            }
        }
    }

    Ok((md.finish(), written))
}

/// Write `markdown` to `path` through a sibling `.tmp` file and a rename.
///
/// An existing output keeps its permissions.
fn write_markdown(path: &Path, markdown: &str) -> Result<(), ConvertError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| ConvertError::write(parent, e))?;

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, markdown).map_err(|e| ConvertError::write(&tmp_path, e))?;

    if let Ok(existing) = std::fs::metadata(path) {
        if let Err(e) = std::fs::set_permissions(&tmp_path, existing.permissions()) {
            warn!("Could not carry permissions over to {}: {}", path.display(), e);
        }
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ConvertError::write(path, e));
    }

    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DocumentMetadata;
    use crate::pipeline::model::{ExtractedImage, FontFlags, Line, Page, Span};

    fn sample_document() -> Document {
        let mut page1 = Page::new(1);
        page1.text = "Plain page one\n".into();
        page1.blocks = vec![
            Block::Text(vec![
                Line::new(vec![
                    Span::plain("Intro with "),
                    Span::new("bold", FontFlags::BOLD),
                    Span::plain(" text"),
                ]),
                Line::new(vec![Span::new("and italics", FontFlags::ITALIC)]),
            ]),
            Block::Other,
            Block::Text(vec![Line::new(vec![Span::new(
                "both",
                FontFlags::BOLD | FontFlags::ITALIC,
            )])]),
        ];
        page1.images = vec![ExtractedImage {
            data: vec![0x89, b'P', b'N', b'G'],
            extension: "png".into(),
        }];

        let mut page2 = Page::new(2);
        page2.text = "   \n".into();

        Document {
            metadata: DocumentMetadata {
                title: Some("Title".into()),
                page_count: 2,
                ..Default::default()
            },
            pages: vec![page1, page2],
        }
    }

    #[test]
    fn assemble_formatted_without_images() {
        let (md, images) = assemble(&sample_document(), true, None).unwrap();
        assert!(images.is_empty());
        assert_eq!(
            md,
            "# Title\n\n---\n\n\
             Intro with **bold** text *and italics*\n\n\
             ***both***\n\n"
        );
    }

    #[test]
    fn assemble_plain_ignores_flags_and_blank_pages() {
        let (md, _) = assemble(&sample_document(), false, None).unwrap();
        assert_eq!(md, "# Title\n\n---\n\nPlain page one\n\n\n");
    }

    #[test]
    fn assemble_writes_images_and_references_them() {
        let tmp = tempfile::tempdir().unwrap();
        let (md, images) = assemble(&sample_document(), true, Some(tmp.path())).unwrap();
        assert_eq!(images, vec![tmp.path().join("image_page1_1.png")]);
        assert!(md.ends_with("***both***\n\n![image_page1_1.png](image_page1_1.png)\n\n"));
        assert_eq!(
            std::fs::read(tmp.path().join("image_page1_1.png")).unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
    }

    #[test]
    fn target_for_suffixless_destination_is_a_directory() {
        let t = Target::resolve(Path::new("in/report.pdf"), Path::new("out/assets"));
        assert_eq!(t.markdown, PathBuf::from("out/assets/report.md"));
        assert_eq!(t.image_dir, PathBuf::from("out/assets"));

        let t = Target::resolve(Path::new("in/report.pdf"), Path::new("out/r.md"));
        assert_eq!(t.markdown, PathBuf::from("out/r.md"));
        assert_eq!(t.image_dir, PathBuf::from("out"));
    }

    #[test]
    fn write_markdown_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("sub/out.md");
        write_markdown(&out, "first").unwrap();
        write_markdown(&out, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "second");
        assert!(!tmp.path().join("sub/out.md.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_markdown_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out.md");
        std::fs::write(&out, "old").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_markdown(&out, "new").unwrap();
        let mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
