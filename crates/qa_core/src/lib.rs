//! Battery QA core: pure data model, text cleaning and QA pair generation.
mod clean;
mod generate;
mod record;
mod report;
mod segment;
mod source;
mod unit;

pub use clean::{normalize_whitespace, CleanConfig, Cleaner};
pub use generate::{
    rows_to_records, GenerationMode, PairGenerator, SegmentConfig, DEFAULT_SEGMENT_TEMPLATE,
    DEFAULT_TITLE_TEMPLATE, UNTITLED,
};
pub use record::{column_union, Batch, QaPair, Record};
pub use report::{Diagnostic, DiagnosticKind, RunReport, Stage, StageReport, StageSummary};
pub use segment::{segment, SegmentMode};
pub use source::{FetchStatus, Source, SourceKind};
pub use unit::{TableRow, TextUnit};
