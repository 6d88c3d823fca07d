mod html;
mod links;
mod pdf;
mod table;

use qa_core::DiagnosticKind;
use scraper::{ElementRef, Selector};

use crate::{decode_text, DecodeError, Document};

pub use html::ContainerExtractor;
pub use links::discover_pdf_links;
pub use pdf::{LopdfBackend, PageText, PdfBackend, PdfExtractor};
pub use table::TableExtractor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("element {unit} has no {missing}")]
    StructureMismatch { unit: usize, missing: String },
    #[error("nothing matches selector {selector}")]
    NotFound { selector: String },
    #[error("invalid selector {selector}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("pdf: {0}")]
    Pdf(String),
}

impl ExtractError {
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            ExtractError::StructureMismatch { .. } | ExtractError::InvalidSelector { .. } => {
                DiagnosticKind::StructureMismatch
            }
            ExtractError::NotFound { .. } => DiagnosticKind::NotFound,
            ExtractError::Decode(_) | ExtractError::Pdf(_) => DiagnosticKind::Decode,
        }
    }
}

/// Units pulled out of one document, plus the per-unit problems that did not
/// stop extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<U> {
    pub units: Vec<U>,
    pub issues: Vec<ExtractError>,
}

impl<U> Default for Extraction<U> {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// Turns a document into units. `Err` means the whole document was unusable.
pub trait Extractor: Send + Sync {
    type Unit;

    fn extract(&self, document: &Document) -> Result<Extraction<Self::Unit>, ExtractError>;
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

pub(crate) fn decode_html(document: &Document) -> Result<String, ExtractError> {
    Ok(decode_text(&document.bytes, document.content_type())?.text)
}

/// Text of the first descendant matching `selector`, trimmed.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(element_text)
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
