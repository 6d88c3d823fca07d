use std::sync::Arc;

use qa_core::TextUnit;

use super::{ExtractError, Extraction, Extractor};
use crate::Document;

/// Text of one page, or why that page could not be decoded.
pub type PageText = Result<String, String>;

/// Low-level PDF decoding. `Err` means the document itself could not be opened.
pub trait PdfBackend: Send + Sync {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractError> {
        let document =
            lopdf::Document::load_mem(bytes).map_err(|err| ExtractError::Pdf(err.to_string()))?;
        Ok(document
            .get_pages()
            .keys()
            .map(|&page| document.extract_text(&[page]).map_err(|err| err.to_string()))
            .collect())
    }
}

/// One text unit per page, in page order.
///
/// A page that fails to decode becomes an empty unit and an issue.
#[derive(Clone)]
pub struct PdfExtractor {
    backend: Arc<dyn PdfBackend>,
}

impl PdfExtractor {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self { backend }
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction<TextUnit>, ExtractError> {
        let mut extraction = Extraction::default();
        for (index, page) in self.backend.page_texts(bytes)?.into_iter().enumerate() {
            match page {
                Ok(text) => extraction.units.push(TextUnit::new(index, text)),
                Err(message) => {
                    extraction.units.push(TextUnit::new(index, String::new()));
                    extraction
                        .issues
                        .push(ExtractError::Pdf(format!("page {}: {message}", index + 1)));
                }
            }
        }
        Ok(extraction)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(Arc::new(LopdfBackend))
    }
}

impl Extractor for PdfExtractor {
    type Unit = TextUnit;

    fn extract(&self, document: &Document) -> Result<Extraction<TextUnit>, ExtractError> {
        self.extract_bytes(&document.bytes)
    }
}
