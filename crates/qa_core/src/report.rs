use std::fmt;
use std::path::PathBuf;

use crate::{FetchStatus, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Discover,
    Fetch,
    Extract,
    Clean,
    Generate,
    Persist,
    Analyze,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discover",
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Clean => "clean",
            Stage::Generate => "generate",
            Stage::Persist => "persist",
            Stage::Analyze => "analyze",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Fetch,
    StructureMismatch,
    NotFound,
    Io,
    Decode,
    Empty,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Fetch => "fetch error",
            DiagnosticKind::StructureMismatch => "structure mismatch",
            DiagnosticKind::NotFound => "not found",
            DiagnosticKind::Io => "io error",
            DiagnosticKind::Decode => "decode error",
            DiagnosticKind::Empty => "nothing to save",
        };
        f.write_str(name)
    }
}

/// One skipped item: which stage, which item, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub subject: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: skipped {} ({}): {}",
            self.stage, self.subject, self.kind, self.message
        )
    }
}

/// Output of one stage: the items that made it through plus a diagnostic per
/// item that did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport<T> {
    pub stage: Stage,
    pub items: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> StageReport<T> {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            items: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn push_item(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn push_diagnostic(
        &mut self,
        subject: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> &Diagnostic {
        self.diagnostics.push(Diagnostic {
            stage: self.stage,
            subject: subject.into(),
            kind,
            message: message.into(),
        });
        &self.diagnostics[self.diagnostics.len() - 1]
    }

    /// Record a source that could not be retrieved. The message is its
    /// failure reason, or its current status if it was never marked failed.
    pub fn push_failed_source(&mut self, source: &Source, kind: DiagnosticKind) -> &Diagnostic {
        let message = match &source.status {
            FetchStatus::Failed(reason) => reason.clone(),
            other => format!("{other:?}"),
        };
        self.push_diagnostic(source.location.as_str(), kind, message)
    }

    pub fn succeeded(&self) -> usize {
        self.items.len()
    }

    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn summary(&self) -> StageSummary {
        StageSummary {
            stage: self.stage,
            succeeded: self.succeeded(),
            skipped: self.skipped(),
        }
    }

    pub fn summary_line(&self) -> String {
        self.summary().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    pub succeeded: usize,
    pub skipped: usize,
}

impl fmt::Display for StageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ok, {} skipped",
            self.stage, self.succeeded, self.skipped
        )
    }
}

/// Aggregated outcome of a whole pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub pipeline: String,
    pub stages: Vec<StageSummary>,
    pub diagnostics: Vec<Diagnostic>,
    pub records_written: usize,
    pub output: Option<PathBuf>,
}

impl RunReport {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }

    /// Absorb a finished stage and hand back its items for the next stage.
    pub fn record_stage<T>(&mut self, report: StageReport<T>) -> Vec<T> {
        self.stages.push(report.summary());
        self.diagnostics.extend(report.diagnostics);
        report.items
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn diagnostics_for(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.stage == stage)
    }

    pub fn total_skipped(&self) -> usize {
        self.diagnostics.len()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} pipeline", self.pipeline)?;
        for stage in &self.stages {
            writeln!(f, "  {stage}")?;
        }
        match &self.output {
            Some(path) => write!(
                f,
                "  {} records written to {}",
                self.records_written,
                path.display()
            ),
            None => write!(f, "  no records written"),
        }
    }
}
