//! Battery QA engine: fetching, extraction, persistence and pipeline orchestration.
mod config;
mod decode;
mod export;
mod extract;
mod fetch;
mod persist;
mod pipeline;
mod stats;
mod types;

pub use config::{ArticleConfig, PaperConfig, PipelineConfig, TableConfig};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use export::{export_training_corpus, ExportError, ExportSummary, TrainingExportConfig};
pub use extract::{
    discover_pdf_links, ContainerExtractor, ExtractError, Extraction, Extractor, LopdfBackend,
    PageText, PdfBackend, PdfExtractor, TableExtractor,
};
pub use fetch::{
    fetch_paginated, record_fetch_failure, FetchRequest, FetchSettings, Fetcher, ReqwestFetcher,
};
pub use persist::{
    ensure_output_dir, list_files_with_extension, persist_records, read_records_json,
    text_filename_for, write_text_file, AtomicFileWriter, PersistError, RecordFormat,
};
pub use pipeline::{Pipeline, PipelineError};
pub use stats::{
    write_statistics, CorpusStatistics, FileWordCount, LengthSummary, QaStatistics,
    WhitespaceWordCounter, WordCounter, HISTOGRAM_BINS,
};
pub use types::{Document, FailureKind, FetchError, FetchMetadata};
