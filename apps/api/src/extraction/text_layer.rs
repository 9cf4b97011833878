//! Text-layer backends. Both are synchronous and run on the blocking pool.

use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;
use tracing::warn;

use crate::extraction::ExtractionError;

/// Reads each page's embedded text with `lopdf`.
/// A page that errors or panics is skipped; the rest of the document still counts.
pub fn lopdf_pages(pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let doc = Document::load_mem(pdf).map_err(|e| ExtractionError::Load(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[*page_number]))) {
            Ok(Ok(text)) => pages.push(text),
            Ok(Err(e)) => warn!("text_layer: skipping page {page_number}: {e}"),
            Err(_) => warn!("text_layer: skipping page {page_number}: backend panicked"),
        }
    }
    Ok(pages)
}

/// Reads each page's text with `pdf-extract`.
pub fn pdf_extract_pages(pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
    match catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::Backend(format!("pdf-extract failed: {e}"))),
        Err(_) => Err(ExtractionError::Panicked("pdf-extract")),
    }
}

/// 1-based page numbers in document order.
pub fn page_numbers(pdf: &[u8]) -> Result<Vec<u32>, ExtractionError> {
    let doc = Document::load_mem(pdf).map_err(|e| ExtractionError::Load(e.to_string()))?;
    Ok(doc.get_pages().keys().copied().collect())
}
