//! Text extraction from PDF textbooks using pdftotext
//!
//! Extraction shells out to the poppler-utils binaries: `pdfinfo` for the
//! page count and `pdftotext` for per-page text. Pages are joined with
//! explicit page markers so downstream chunks retain page context.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Errors that can occur during text extraction
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF not found: {0}")]
    FileNotFound(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of extracting a PDF's text layer
#[derive(Debug)]
pub struct ExtractedText {
    /// Full text with page markers between pages
    pub text: String,
    /// Number of pages processed
    pub page_count: u32,
}

/// Handle command output, extracting stdout on success or returning appropriate error
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!("{}: {}", error_prefix, stderr)))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Extract text from all pages of a PDF file
///
/// Each page's text is prefixed with a `--- Page N ---` marker. Pages whose
/// text layer is empty still contribute their marker so page numbering
/// stays aligned.
pub fn extract_text(pdf_path: &Path) -> Result<ExtractedText, ExtractionError> {
    if !pdf_path.exists() {
        return Err(ExtractionError::FileNotFound(pdf_path.display().to_string()));
    }

    let page_count = get_page_count(pdf_path).unwrap_or(1);

    let mut text = String::new();
    for page_num in 1..=page_count {
        let page_text = extract_page_text(pdf_path, page_num)?;
        text.push_str(&format!("\n--- Page {} ---\n", page_num));
        text.push_str(&page_text);
    }

    tracing::debug!("Extracted {} chars from {} pages", text.len(), page_count);

    Ok(ExtractedText { text, page_count })
}

/// Extract text from a single page using pdftotext
fn extract_page_text(pdf_path: &Path, page: u32) -> Result<String, ExtractionError> {
    let page_str = page.to_string();
    let output = Command::new("pdftotext")
        .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
        .arg(pdf_path)
        .arg("-") // Output to stdout
        .output();

    handle_cmd_output(
        output,
        "pdftotext (install poppler-utils)",
        &format!("pdftotext failed on page {}", page),
    )
}

/// Get the page count of a PDF via pdfinfo
fn get_page_count(pdf_path: &Path) -> Option<u32> {
    let output = Command::new("pdfinfo").arg(pdf_path).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if line.starts_with("Pages:") {
            return line.split_whitespace().nth(1).and_then(|s| s.parse().ok());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let result = extract_text(Path::new("/nonexistent/book.pdf"));
        assert!(matches!(result, Err(ExtractionError::FileNotFound(_))));
    }
}
