//! OCR fallback: `pdftoppm` rasterizes each page to PNG, `tesseract` reads it back.
//!
//! Page images live in a temporary directory that is removed when the
//! extraction finishes, successfully or not.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use super::ExtractionError;

const PAGE_PREFIX: &str = "page";

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    /// Upper bound for each individual tool invocation.
    pub timeout: Duration,
    pub language: String,
}

impl OcrConfig {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            pdftoppm_path: config.pdftoppm_path.clone(),
            tesseract_path: config.tesseract_path.clone(),
            timeout: Duration::from_secs(config.ocr_timeout_secs),
            language: "eng".to_string(),
        }
    }
}

/// Runs OCR over every page and returns the combined text with the page count.
pub async fn ocr_pdf(bytes: &[u8], config: &OcrConfig) -> Result<(String, usize), ExtractionError> {
    let workdir = tempfile::tempdir()?;
    let pdf_path = workdir.path().join("resume.pdf");
    tokio::fs::write(&pdf_path, bytes).await?;

    let prefix = workdir.path().join(PAGE_PREFIX);
    run_tool(
        &config.pdftoppm_path,
        [OsStr::new("-png"), pdf_path.as_os_str(), prefix.as_os_str()],
        config.timeout,
    )
    .await?;

    let pages = list_page_images(workdir.path())?;
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for page in &pages {
        let stdout = run_tool(
            &config.tesseract_path,
            [
                page.as_os_str(),
                OsStr::new("stdout"),
                OsStr::new("-l"),
                OsStr::new(&config.language),
            ],
            config.timeout,
        )
        .await?;
        debug!("OCR read {} bytes from {}", stdout.len(), page.display());
        page_texts.push(String::from_utf8_lossy(&stdout).trim().to_string());
    }

    Ok((join_pages(&page_texts), pages.len()))
}

/// Joins page texts with a blank line between pages.
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n\n").trim().to_string()
}

/// Page images written by `pdftoppm`, ordered by page number.
///
/// `pdftoppm` names pages `page-1.png` or `page-01.png` depending on the
/// page count, so ordering is numeric rather than lexical.
pub fn list_page_images(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let number = page_number(path.file_name()?.to_str()?)?;
            Some((number, path))
        })
        .collect();
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Runs an external tool and returns its stdout.
/// The child is killed if the timeout elapses.
pub async fn run_tool<I, S>(
    program: &str,
    args: I,
    timeout: Duration,
) -> Result<Vec<u8>, ExtractionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| ExtractionError::Timeout {
            tool: program.to_string(),
            secs: timeout.as_secs(),
        })?
        .map_err(|source| ExtractionError::Spawn {
            tool: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExtractionError::ToolFailed {
            tool: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}
