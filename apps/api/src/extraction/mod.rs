//! Resume text extraction.
//!
//! Text-based PDFs are read through their text layer. Scanned PDFs (no text
//! layer) are rasterized with `pdftoppm` and run through `tesseract`.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod ocr;

pub use ocr::OcrConfig;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("Uploaded file is empty")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("OCR produced no page images")]
    NoPages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PdfText,
    Ocr,
}

impl ExtractionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionMethod::PdfText => "pdf_text",
            ExtractionMethod::Ocr => "ocr",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    /// Number of rasterized pages; only known for OCR.
    pub page_count: Option<usize>,
}

/// Rejects empty uploads and anything without the `%PDF` header.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractionError::NotPdf);
    }
    Ok(())
}

/// Reads the PDF text layer on the blocking pool.
///
/// Returns `None` when the document is not text-based: the layer is blank,
/// or the parser fails or panics on the document.
pub async fn text_layer(bytes: &[u8]) -> Option<String> {
    let owned = bytes.to_vec();
    let text = match tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&owned)
    })
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text layer could not be read: {e}");
            return None;
        }
        Err(e) => {
            warn!("PDF text extraction task aborted: {e}");
            return None;
        }
    };

    (!text.trim().is_empty()).then_some(text)
}

/// Extracts resume text, falling back to OCR for scanned documents.
pub async fn extract_text(
    bytes: &[u8],
    ocr_config: &OcrConfig,
) -> Result<ExtractedText, ExtractionError> {
    ensure_pdf(bytes)?;

    if let Some(text) = text_layer(bytes).await {
        info!("Extracted {} chars from PDF text layer", text.len());
        return Ok(ExtractedText {
            text,
            method: ExtractionMethod::PdfText,
            page_count: None,
        });
    }

    info!("PDF has no text layer, falling back to OCR");
    let (text, pages) = ocr::ocr_pdf(bytes, ocr_config).await?;
    info!("OCR extracted {} chars from {} pages", text.len(), pages);

    Ok(ExtractedText {
        text,
        method: ExtractionMethod::Ocr,
        page_count: Some(pages),
    })
}
