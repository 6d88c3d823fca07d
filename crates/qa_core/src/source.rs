#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Page,
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Pending,
    Fetched,
    Failed(String),
}

/// A URL or local file path the pipeline reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub location: String,
    pub kind: SourceKind,
    pub status: FetchStatus,
}

impl Source {
    pub fn new(location: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            location: location.into(),
            kind,
            status: FetchStatus::Pending,
        }
    }

    pub fn page(location: impl Into<String>) -> Self {
        Self::new(location, SourceKind::Page)
    }

    pub fn pdf(location: impl Into<String>) -> Self {
        Self::new(location, SourceKind::Pdf)
    }

    pub fn mark_fetched(&mut self) {
        self.status = FetchStatus::Fetched;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = FetchStatus::Failed(reason.into());
    }

    pub fn is_fetched(&self) -> bool {
        self.status == FetchStatus::Fetched
    }
}
