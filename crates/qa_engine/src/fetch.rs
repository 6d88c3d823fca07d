use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use qa_core::{DiagnosticKind, Source, SourceKind, Stage, StageReport};
use qa_logging::{qa_debug, qa_info, qa_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Deserializer};

use crate::{Document, FailureKind, FetchError, FetchMetadata};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(deserialize_with = "duration_from_secs")]
    pub connect_timeout: Duration,
    #[serde(deserialize_with = "duration_from_secs")]
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 50 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
                "application/pdf".to_string(),
            ],
        }
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

/// One GET request: base URL, extra query parameters, expected resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub kind: SourceKind,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            kind: SourceKind::Page,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_page(self, page: u32) -> Self {
        self.with_query("page", page.to_string())
    }

    pub fn pdf(mut self) -> Self {
        self.kind = SourceKind::Pdf;
        self
    }

    pub fn to_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// The not-yet-fetched source this request targets.
    pub fn source(&self) -> Source {
        Source::new(self.display_url(), self.kind)
    }

    /// Full URL for logs and diagnostics, falling back to the raw base URL.
    pub fn display_url(&self) -> String {
        self.to_url()
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.url.clone())
    }
}

/// Retrieves one resource. Implementations must not retry on their own.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Document, FetchError>;
}

/// HTTP GET over reqwest with size, content-type and redirect limits.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// A client whose redirect policy reports the hop count into `redirects`.
    fn client(&self, redirects: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let hops = attempt.previous().len();
            redirects.store(hops, Ordering::Relaxed);
            if hops >= limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            format!("{actual} bytes exceeds the {} byte limit", self.settings.max_bytes),
        )
    }

    fn check_declared_length(&self, response: &reqwest::Response) -> Result<(), FetchError> {
        match response.content_length() {
            Some(declared) if declared > self.settings.max_bytes => Err(self.too_large(declared)),
            _ => Ok(()),
        }
    }

    /// A response without a `Content-Type` header is let through.
    fn check_content_type(&self, content_type: Option<&str>) -> Result<(), FetchError> {
        let Some(content_type) = content_type else {
            return Ok(());
        };
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        let allowed = self
            .settings
            .allowed_content_types
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(mime));
        if allowed {
            Ok(())
        } else {
            Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: content_type.to_string(),
                },
                format!("{mime} is not an accepted content type"),
            ))
        }
    }

    /// Streams the body, failing as soon as it grows past `max_bytes`.
    async fn read_capped_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.settings.max_bytes {
                return Err(self.too_large(received));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Only `200 OK` counts; any other status, 2xx included, is a failure.
fn check_status(response: &reqwest::Response) -> Result<(), FetchError> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Document, FetchError> {
        let url = request.to_url()?;
        let requested_url = url.to_string();
        let redirects = Arc::new(AtomicUsize::new(0));

        let response = self
            .client(Arc::clone(&redirects))?
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        self.check_declared_length(&response)?;

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.check_content_type(content_type.as_deref())?;

        let bytes = self.read_capped_body(response).await?;
        qa_debug!("Fetched {} bytes from {}", bytes.len(), final_url);

        let mut source = Source::new(requested_url.as_str(), request.kind);
        source.mark_fetched();
        Ok(Document {
            source,
            metadata: FetchMetadata {
                requested_url,
                final_url,
                redirects: redirects.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}

/// Fetch `base_url?page=1..=max_pages` one page at a time.
///
/// A failed page becomes a diagnostic and the remaining pages are still fetched.
pub async fn fetch_paginated(
    fetcher: &dyn Fetcher,
    base_url: &str,
    max_pages: u32,
) -> StageReport<Document> {
    let mut report = StageReport::new(Stage::Fetch);
    for page in 1..=max_pages {
        let request = FetchRequest::new(base_url).with_page(page);
        qa_info!("Crawling page: {}", request.display_url());
        match fetcher.fetch(&request).await {
            Ok(document) => report.push_item(document),
            Err(err) => {
                record_fetch_failure(&mut report, &request, &err);
            }
        }
    }
    report
}

/// Mark the request's source failed and record it as a skipped item.
pub fn record_fetch_failure<T>(
    report: &mut StageReport<T>,
    request: &FetchRequest,
    err: &FetchError,
) -> Source {
    let mut source = request.source();
    source.mark_failed(err.to_string());
    let diagnostic = report.push_failed_source(&source, DiagnosticKind::Fetch);
    qa_warn!("{}", diagnostic);
    source
}
