use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Turns raw document bytes into per-page text, in page order.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_pages(&self, bytes: Vec<u8>) -> Result<Vec<String>, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Unreadable(String),
    #[error("text extraction timed out after {0}s")]
    TimedOut(u64),
    #[error("text extraction task failed: {0}")]
    Task(String),
}

/// Text that survived extraction. Pages without text are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pages: Vec<String>,
}

impl ExtractedText {
    pub fn from_pages(raw: Vec<String>) -> Self {
        Self {
            pages: raw.into_iter().filter(|p| !p.trim().is_empty()).collect(),
        }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All kept pages, each followed by a newline.
    pub fn body(&self) -> String {
        let mut body = String::with_capacity(self.pages.iter().map(|p| p.len() + 1).sum());
        for page in &self.pages {
            body.push_str(page);
            body.push('\n');
        }
        body
    }
}

/// PDF extraction via `pdftotext` (poppler), falling back to the pure-Rust
/// `pdf_extract` when poppler is missing or finds nothing.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    /// CPU-bound, so it runs on the blocking pool under a timeout.
    async fn extract_pages(&self, bytes: Vec<u8>) -> Result<Vec<String>, ExtractionError> {
        tracing::info!("extract_pages: starting extraction ({} bytes)", bytes.len());

        let handle = tokio::task::spawn_blocking(move || {
            let result = extract_pages_sync(&bytes);
            match &result {
                Ok(pages) => tracing::info!(
                    "extract_pages: {} page(s), {} chars",
                    pages.len(),
                    pages.iter().map(|p| p.len()).sum::<usize>()
                ),
                Err(e) => tracing::error!("extract_pages: extraction failed: {e}"),
            }
            result
        });

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(join_result) => join_result.map_err(|e| ExtractionError::Task(e.to_string()))?,
            Err(_) => Err(ExtractionError::TimedOut(self.timeout.as_secs())),
        }
    }
}

fn extract_pages_sync(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    choose_pages(extract_pages_pdftotext(bytes), || {
        tracing::info!("Extracting PDF via pdf_extract (this may be slow for large files)");
        extract_pages_pdf_extract(bytes)
    })
}

/// Keeps pdftotext pages that carry text, otherwise asks the fallback.
///
/// A document pdftotext opened but found blank (scanned pages) stays a
/// successful, empty extraction when the fallback cannot read it either.
fn choose_pages(
    primary: Result<Vec<String>>,
    fallback: impl FnOnce() -> Result<Vec<String>, ExtractionError>,
) -> Result<Vec<String>, ExtractionError> {
    match primary {
        Ok(pages) if pages.iter().any(|p| !p.trim().is_empty()) => {
            tracing::info!("PDF extracted via pdftotext");
            Ok(pages)
        }
        Ok(blank) => {
            tracing::warn!("pdftotext returned empty text, falling back to pdf_extract");
            fallback().or_else(|e| {
                tracing::warn!("pdf_extract failed ({e}), keeping {} blank page(s)", blank.len());
                Ok(blank)
            })
        }
        Err(e) => {
            tracing::warn!("pdftotext failed ({e:#}), falling back to pdf_extract");
            fallback()
        }
    }
}

fn extract_pages_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf_extract panics on some malformed files instead of returning an error.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Unreadable(format!(
            "Failed to extract text from PDF: {e}"
        ))),
        Err(_) => Err(ExtractionError::Unreadable(
            "Failed to extract text from PDF: malformed document".to_string(),
        )),
    }
}

fn extract_pages_pdftotext(bytes: &[u8]) -> Result<Vec<String>> {
    use std::io::Write;
    use std::process::Command;

    let mut tmp = tempfile::NamedTempFile::new().context("Failed to create temp file")?;
    tmp.write_all(bytes).context("Failed to write PDF to temp file")?;
    tmp.flush()?;

    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(tmp.path())
        .arg("-") // output to stdout
        .output()
        .context("Failed to run pdftotext, is poppler-utils installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pdftotext exited with {}: {stderr}", output.status);
    }

    let text = String::from_utf8(output.stdout).context("pdftotext output is not valid UTF-8")?;
    Ok(split_form_feeds(&text))
}

/// pdftotext ends every page with a form feed.
fn split_form_feeds(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
    if pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    pages
}
