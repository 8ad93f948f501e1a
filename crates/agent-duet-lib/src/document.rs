//! Turning uploaded document bytes into plain text.
//!
//! [`PlainTextExtractor`] decodes UTF-8. With the `pdf` feature,
//! `PdfExtractor` pulls the text layer out of PDF files. Use
//! [`extractor_for_path`] to pick one by file extension.

use std::path::Path;

use anyhow::Result;

/// Extracts the text content of a document.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Treats the bytes as UTF-8 text, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Text layer of a PDF file. Scanned pages without text come back empty.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| anyhow::anyhow!("extracting PDF text: {}", e))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Extractor for the file at `path`, chosen by extension.
///
/// `.pdf` selects `PdfExtractor`; everything else is read as plain text.
///
/// # Errors
///
/// A `.pdf` path when the crate was built without the `pdf` feature.
pub fn extractor_for_path(path: &Path) -> Result<Box<dyn TextExtractor>> {
    if !is_pdf(path) {
        return Ok(Box::new(PlainTextExtractor));
    }
    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(PdfExtractor))
    }
    #[cfg(not(feature = "pdf"))]
    {
        anyhow::bail!(
            "{} is a PDF but PDF support is not enabled (build with the `pdf` feature)",
            path.display()
        )
    }
}
