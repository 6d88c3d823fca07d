use std::fs;
use std::io;
use std::path::Path;

use qa_core::Source;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Raw bytes of one fetched or loaded resource plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: Source,
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

impl Document {
    /// A document that did not go through HTTP: no redirects, the location is
    /// both the requested and the final URL.
    pub fn from_bytes(source: Source, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let metadata = FetchMetadata {
            requested_url: source.location.clone(),
            final_url: source.location.clone(),
            redirects: 0,
            content_type: content_type.map(str::to_string),
            byte_len: bytes.len() as u64,
        };
        Self {
            source,
            bytes,
            metadata,
        }
    }

    pub fn from_pdf_file(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let mut source = Source::pdf(path.to_string_lossy());
        source.mark_fetched();
        Ok(Self::from_bytes(source, bytes, Some(PDF_CONTENT_TYPE)))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.metadata.content_type.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// URL as sent, query string included.
    pub requested_url: String,
    pub final_url: String,
    pub redirects: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Why a single resource could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("redirect limit exceeded")]
    RedirectLimitExceeded,
    #[error("response too large (limit {max_bytes} bytes)")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("unsupported content type {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("network error")]
    Network,
}
