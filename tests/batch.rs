//! Batch conversion: validation, output placement and exit status.

mod common;

use common::{hello_document, touch_pdf, FakeEngine};
use pdftomarkd::{
    convert_batch, resolve_output_path, ConversionConfig, ConversionProgressCallback,
    ConvertError, FailureKind, PdfEngine, ProgressCallback,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_file_start(&self, input: &Path, _output: Option<&Path>) {
        self.push("start", input);
    }

    fn on_file_complete(&self, input: &Path, _output: Option<&Path>, _markdown_len: usize) {
        self.push("done", input);
    }

    fn on_file_error(&self, input: &Path, _error: &ConvertError) {
        self.push("error", input);
    }
}

impl RecordingCallback {
    fn push(&self, event: &str, input: &Path) {
        let name = input.file_name().unwrap().to_string_lossy();
        self.events.lock().unwrap().push(format!("{event}:{name}"));
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

fn config(engine: FakeEngine, callback: Option<Arc<RecordingCallback>>) -> ConversionConfig {
    let mut builder = ConversionConfig::builder().engine(Arc::new(engine) as Arc<dyn PdfEngine>);
    if let Some(cb) = callback {
        builder = builder.progress_callback(cb as ProgressCallback);
    }
    builder.build().unwrap()
}

#[tokio::test]
async fn one_bad_input_fails_the_batch_but_not_the_others() {
    let tmp = tempfile::tempdir().unwrap();
    let good = touch_pdf(tmp.path(), "good.pdf");
    let missing = tmp.path().join("missing.pdf");
    let text = tmp.path().join("readme.txt");
    std::fs::write(&text, "hi").unwrap();
    let out_dir = tmp.path().join("out");

    let recorder = Arc::new(RecordingCallback::default());
    let cfg = config(
        FakeEngine::new().with("good.pdf", hello_document()),
        Some(Arc::clone(&recorder)),
    );

    let report = convert_batch(
        &[missing.clone(), text.clone(), good.clone()],
        Some(out_dir.as_path()),
        &cfg,
    )
    .await;

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.succeeded[0].output, out_dir.join("good.md"));
    assert!(out_dir.join("good.md").is_file());

    let kinds: Vec<FailureKind> = report.failed.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Input, FailureKind::Input]);
    assert_eq!(report.failed[0].input, missing);
    assert_eq!(report.failed[1].input, text);

    assert_eq!(
        recorder.events(),
        vec!["error:missing.pdf", "error:readme.txt", "start:good.pdf", "done:good.pdf"]
    );
}

#[tokio::test]
async fn all_good_inputs_exit_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let a = touch_pdf(tmp.path(), "a.pdf");
    let b = touch_pdf(tmp.path(), "b.PDF");
    let out_dir = tmp.path().join("md");
    let cfg = config(
        FakeEngine::new()
            .with("a.pdf", hello_document())
            .with("b.PDF", hello_document()),
        None,
    );

    let report = convert_batch(&[a, b], Some(out_dir.as_path()), &cfg).await;
    assert_eq!(report.exit_code(), 0);
    assert!(out_dir.join("a.md").is_file());
    assert!(out_dir.join("b.md").is_file());
}

#[tokio::test]
async fn unreadable_pdf_is_an_open_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let broken = touch_pdf(tmp.path(), "broken.pdf");
    let cfg = config(FakeEngine::new(), None);

    let report = convert_batch(&[broken], Some(tmp.path().join("x.md").as_path()), &cfg).await;
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.failed[0].kind, FailureKind::Open);
}

#[tokio::test]
async fn single_input_with_suffixless_output_gets_md_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = touch_pdf(tmp.path(), "hello.pdf");
    let cfg = config(FakeEngine::new().with("hello.pdf", hello_document()), None);

    let report = convert_batch(&[pdf], Some(tmp.path().join("notes/result").as_path()), &cfg).await;
    assert_eq!(report.exit_code(), 0);
    assert_eq!(
        report.succeeded[0].output,
        tmp.path().join("notes/result.md")
    );
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("notes/result.md")).unwrap(),
        "# Greeting\n\n---\n\nHello **World**\n\n"
    );
}

#[tokio::test]
async fn dotted_stems_get_distinct_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let v1 = touch_pdf(tmp.path(), "report.v1.pdf");
    let v2 = touch_pdf(tmp.path(), "report.v2.pdf");
    let out_dir = tmp.path().join("out");
    let cfg = config(
        FakeEngine::new()
            .with("report.v1.pdf", hello_document())
            .with("report.v2.pdf", hello_document()),
        None,
    );

    let report = convert_batch(&[v1, v2], Some(out_dir.as_path()), &cfg).await;

    assert_eq!(report.exit_code(), 0);
    let outputs: Vec<PathBuf> = report.succeeded.iter().map(|r| r.output.clone()).collect();
    assert_eq!(
        outputs,
        vec![out_dir.join("report.v1.md"), out_dir.join("report.v2.md")]
    );
    assert!(out_dir.join("report.v1.md").is_file());
    assert!(out_dir.join("report.v2.md").is_file());
    assert!(!out_dir.join("report.md").exists());
}

/// Fails every page read, the way an undecodable embedded image does.
struct FailingPageEngine;

impl PdfEngine for FailingPageEngine {
    fn load(
        &self,
        path: &Path,
        _options: &pdftomarkd::LoadOptions,
    ) -> Result<pdftomarkd::Document, ConvertError> {
        Err(ConvertError::Extract {
            path: path.to_path_buf(),
            page: 2,
            detail: "image 1 could not be decoded".into(),
        })
    }
}

#[tokio::test]
async fn page_extraction_failure_fails_the_file_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = touch_pdf(tmp.path(), "scan.pdf");
    let dest = tmp.path().join("scan.md");
    let cfg = ConversionConfig::builder()
        .engine(Arc::new(FailingPageEngine) as Arc<dyn PdfEngine>)
        .build()
        .unwrap();

    let report = convert_batch(&[pdf], Some(dest.as_path()), &cfg).await;

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.failed[0].kind, FailureKind::Extract);
    assert!(report.failed[0].message.contains("page 2"));
    assert!(!dest.exists());
}

#[test]
fn output_resolution_rules() {
    let tmp = tempfile::tempdir().unwrap();
    let input = Path::new("docs/report.pdf");

    let file = tmp.path().join("a/b/out.markdown");
    assert_eq!(resolve_output_path(input, Some(file.as_path()), 3).unwrap(), file);
    assert!(tmp.path().join("a/b").is_dir());

    let dir = tmp.path().join("many");
    assert_eq!(
        resolve_output_path(input, Some(dir.as_path()), 2).unwrap(),
        dir.join("report.md")
    );
    assert!(dir.is_dir());

    assert_eq!(
        resolve_output_path(input, None, 2).unwrap(),
        PathBuf::from("./report.md")
    );
}
