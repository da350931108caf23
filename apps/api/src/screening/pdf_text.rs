//! Resume text extraction.
//!
//! Pages are extracted one at a time with lopdf so a single unreadable page
//! only costs its own text. When every page comes back blank, the whole
//! document is given one more pass through pdf-extract, whose font decoding
//! copes with some encodings lopdf does not. No OCR: image-only scans yield
//! little or no text and are rejected upstream by the length check.

use lopdf::Document;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Turns uploaded document bytes into plain text. Blocking; call from
/// `spawn_blocking`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError>;
}

/// Outcome of extracting a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    Text(String),
    Empty { page: u32, reason: String },
}

impl PageText {
    fn as_str(&self) -> &str {
        match self {
            PageText::Text(text) => text,
            PageText::Empty { .. } => "",
        }
    }
}

/// Joins page results in order with newline separators; failed pages contribute "".
pub fn join_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(PageText::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        let document =
            Document::load_mem(bytes).map_err(|e| AppError::PdfReadFailed(e.to_string()))?;

        let pages = extract_pages(&document);
        for skipped in &pages {
            if let PageText::Empty { page, reason } = skipped {
                warn!("Skipping unreadable PDF page {page}: {reason}");
            }
        }
        let text = join_pages(&pages);

        if !text.trim().is_empty() {
            return Ok(text);
        }

        debug!(
            "lopdf produced no text across {} page(s); trying pdf-extract",
            pages.len()
        );
        Ok(whole_document_fallback(bytes).unwrap_or(text))
    }
}

fn extract_pages(document: &Document) -> Vec<PageText> {
    document
        .get_pages()
        .into_keys()
        .map(|page| match document.extract_text(&[page]) {
            Ok(text) => PageText::Text(text),
            Err(e) => PageText::Empty {
                page,
                reason: e.to_string(),
            },
        })
        .collect()
}

/// pdf-extract panics on some malformed inputs; treat that like any other miss.
fn whole_document_fallback(bytes: &[u8]) -> Option<String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            debug!("pdf-extract fallback failed: {e}");
            None
        }
        Err(_) => {
            warn!("pdf-extract fallback panicked");
            None
        }
    }
}
