use crate::document::ReportDocument;
use crate::error::RenderError;
use async_trait::async_trait;
use configuration::PdfSettings;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Projects a report's HTML into a binary (PDF) artifact.
///
/// The report flow depends only on this trait. `HtmlOnly` is the always-available
/// strategy; `ExternalPdfConverter` is selected at startup when its command exists.
#[async_trait]
pub trait DocumentConverter: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    async fn to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// The textual-only strategy: never produces a PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOnly;

#[async_trait]
impl DocumentConverter for HtmlOnly {
    fn name(&self) -> &'static str {
        "html-only"
    }

    async fn to_pdf(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Unavailable)
    }
}

/// Pipes the HTML through an external HTML-to-PDF command (stdin in, PDF on stdout).
#[derive(Debug, Clone)]
pub struct ExternalPdfConverter {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalPdfConverter {
    pub fn new(program: PathBuf, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            timeout,
        }
    }

    /// Resolves the configured command on `PATH`, or checks it directly when it
    /// is a path. Returns `None` unless an executable is found, which leaves the
    /// caller on the HTML-only strategy.
    pub fn locate(settings: &PdfSettings) -> Option<Self> {
        if settings.command.is_empty() {
            return None;
        }
        let program = which::which(&settings.command).ok()?;
        Some(Self::new(
            program,
            settings.args.clone(),
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl DocumentConverter for ExternalPdfConverter {
    fn name(&self) -> &'static str {
        "external-pdf"
    }

    async fn to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("converter stdin was not captured"))?;
        let input = html.as_bytes().to_vec();
        // Feed stdin concurrently so a converter that streams output cannot deadlock.
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        if let Ok(Err(e)) = writer.await {
            tracing::debug!(error = %e, "Converter closed stdin early.");
        }

        if !output.status.success() {
            return Err(RenderError::ConverterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}

/// Picks the converter strategy once, at startup.
pub fn select_converter(settings: &PdfSettings) -> Arc<dyn DocumentConverter> {
    if !settings.enabled {
        tracing::info!("PDF rendering disabled; reports will be served as HTML.");
        return Arc::new(HtmlOnly);
    }
    match ExternalPdfConverter::locate(settings) {
        Some(converter) => {
            tracing::info!(program = %converter.program().display(), "PDF rendering enabled.");
            Arc::new(converter)
        }
        None => {
            tracing::warn!(
                command = %settings.command,
                "PDF converter not found on PATH; reports will be served as HTML."
            );
            Arc::new(HtmlOnly)
        }
    }
}

/// A report artifact: the HTML, plus the PDF when conversion succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedReport {
    Html(String),
    Pdf { html: String, pdf: Vec<u8> },
}

impl RenderedReport {
    pub fn html(&self) -> &str {
        match self {
            RenderedReport::Html(html) | RenderedReport::Pdf { html, .. } => html,
        }
    }

    pub fn pdf(&self) -> Option<&[u8]> {
        match self {
            RenderedReport::Pdf { pdf, .. } => Some(pdf),
            RenderedReport::Html(_) => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RenderedReport::Html(_) => "text/html; charset=utf-8",
            RenderedReport::Pdf { .. } => "application/pdf",
        }
    }
}

/// Renders the document to HTML and, if the converter can, to PDF.
///
/// Conversion failures are logged and swallowed: the same HTML is returned either
/// way, so callers never see different content depending on the path taken.
pub async fn render_artifact(
    converter: &dyn DocumentConverter,
    document: &ReportDocument,
) -> RenderedReport {
    let html = document.to_html();
    match converter.to_pdf(&html).await {
        Ok(pdf) => RenderedReport::Pdf { html, pdf },
        Err(RenderError::Unavailable) => RenderedReport::Html(html),
        Err(e) => {
            tracing::warn!(error = %e, converter = converter.name(), "PDF generation failed; falling back to HTML.");
            RenderedReport::Html(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ReportRow, ReportSection};

    fn document() -> ReportDocument {
        ReportDocument {
            title: "ROI Report — Test".to_string(),
            summary: "Summary".to_string(),
            sections: vec![ReportSection {
                heading: "Key results".to_string(),
                rows: vec![ReportRow {
                    label: "Payback period".to_string(),
                    value: "3 months".to_string(),
                    emphasis: false,
                }],
            }],
            notes: "Notes".to_string(),
        }
    }

    fn settings(command: &str, args: &[&str], timeout_secs: u64) -> PdfSettings {
        PdfSettings {
            enabled: true,
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn html_only_returns_html_unchanged() {
        let doc = document();
        let rendered = render_artifact(&HtmlOnly, &doc).await;
        assert_eq!(rendered, RenderedReport::Html(doc.to_html()));
        assert_eq!(rendered.content_type(), "text/html; charset=utf-8");
        assert!(rendered.pdf().is_none());
    }

    #[test]
    fn missing_command_selects_html_only() {
        let converter = select_converter(&settings("no-such-pdf-tool-installed", &[], 5));
        assert_eq!(converter.name(), "html-only");

        let disabled = PdfSettings {
            enabled: false,
            ..settings("cat", &[], 5)
        };
        assert_eq!(select_converter(&disabled).name(), "html-only");
    }

    #[test]
    fn missing_explicit_path_is_not_selected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("wkhtmltopdf");
        assert!(ExternalPdfConverter::locate(&settings(missing.to_str().unwrap(), &[], 5)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_files_are_not_selected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("wkhtmltopdf");
        std::fs::write(&fake, "not a program").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o644)).unwrap();

        let pdf = settings(fake.to_str().unwrap(), &[], 5);
        assert!(ExternalPdfConverter::locate(&pdf).is_none());
        assert_eq!(select_converter(&pdf).name(), "html-only");

        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(ExternalPdfConverter::locate(&pdf).unwrap().program(), fake.as_path());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn external_converter_returns_stdout() {
        let converter = ExternalPdfConverter::locate(&settings("cat", &[], 5)).unwrap();
        let doc = document();
        let rendered = render_artifact(&converter, &doc).await;

        // `cat` echoes its input, so the "PDF" is the HTML bytes.
        assert_eq!(rendered.pdf(), Some(doc.to_html().as_bytes()));
        assert_eq!(rendered.html(), doc.to_html());
        assert_eq!(rendered.content_type(), "application/pdf");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_converter_falls_back_to_identical_html() {
        let converter = ExternalPdfConverter::locate(&settings("false", &[], 5)).unwrap();
        let err = converter.to_pdf("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, RenderError::ConverterFailed { .. }));

        let doc = document();
        let rendered = render_artifact(&converter, &doc).await;
        assert_eq!(rendered, RenderedReport::Html(doc.to_html()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_converter_times_out() {
        let converter = ExternalPdfConverter::new(
            which::which("sleep").unwrap(),
            vec!["5".to_string()],
            Duration::from_millis(100),
        );
        let err = converter.to_pdf("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_converter_is_an_error() {
        let converter = ExternalPdfConverter::locate(&settings("true", &[], 5)).unwrap();
        let err = converter.to_pdf("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, RenderError::EmptyOutput));
    }
}
