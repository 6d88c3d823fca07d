use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use qa_core::{
    rows_to_records, Cleaner, DiagnosticKind, PairGenerator, Record, RunReport, Stage,
    StageReport, TableRow, TextUnit,
};
use qa_logging::{qa_info, qa_warn};

use crate::{
    decode_text, discover_pdf_links, ensure_output_dir, fetch_paginated,
    list_files_with_extension, persist_records, record_fetch_failure, text_filename_for,
    write_statistics, write_text_file, AtomicFileWriter, ContainerExtractor, CorpusStatistics, Document,
    ExtractError, Extractor, FetchRequest, Fetcher, LopdfBackend, PdfBackend, PdfExtractor,
    PersistError, PipelineConfig, QaStatistics, RecordFormat, ReqwestFetcher, TableExtractor,
    WhitespaceWordCounter,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ExtractError),
}

/// Runs the crawl -> extract -> clean -> generate -> persist stages.
///
/// Stages run strictly one after another, each over the complete output of
/// the previous one. A failing item is logged, recorded in the run report and
/// skipped; a stage left with nothing still hands an empty input downstream.
pub struct Pipeline<F> {
    fetcher: F,
    config: PipelineConfig,
    pdf_backend: Arc<dyn PdfBackend>,
}

impl Pipeline<ReqwestFetcher> {
    pub fn from_config(config: PipelineConfig) -> Self {
        let fetcher = ReqwestFetcher::new(config.fetch.clone());
        Self::new(fetcher, config)
    }
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            config,
            pdf_backend: Arc::new(LopdfBackend),
        }
    }

    pub fn with_pdf_backend(mut self, backend: Arc<dyn PdfBackend>) -> Self {
        self.pdf_backend = backend;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Paginated article listing -> title/body QA pairs in a JSON file.
    pub async fn run_articles(&self) -> Result<RunReport, PipelineError> {
        let config = &self.config.articles;
        let extractor = ContainerExtractor::new(
            &config.container_selector,
            &config.title_selector,
            &config.body_selector,
        )?;
        let mut run = RunReport::new("articles");

        start_stage(Stage::Fetch, format!("crawling {} pages of {}", config.max_pages, config.base_url));
        let documents = finish_stage(
            &mut run,
            fetch_paginated(&self.fetcher, &config.base_url, config.max_pages).await,
        );

        start_stage(Stage::Extract, format!("{} pages", documents.len()));
        let mut extracted = StageReport::new(Stage::Extract);
        for document in &documents {
            if let Some(units) = extract_document(&extractor, document, &mut extracted) {
                for unit in units {
                    extracted.push_item(unit);
                }
            }
        }
        let units = renumber(finish_stage(&mut run, extracted));

        start_stage(Stage::Clean, format!("{} articles", units.len()));
        let cleaner = Cleaner::new(config.clean.clone());
        let mut cleaned = StageReport::new(Stage::Clean);
        for unit in units {
            cleaned.push_item(TextUnit {
                index: unit.index,
                title: unit.title.map(|title| cleaner.clean(&title)),
                text: cleaner.clean(&unit.text),
            });
        }
        let units = finish_stage(&mut run, cleaned);

        start_stage(Stage::Generate, "title/body QA pairs");
        let generator = PairGenerator::with_title_template(config.question_template.as_str());
        let records = generate_stage(&mut run, generator.generate(&units));

        persist_stage(&mut run, &records, &config.output);
        Ok(run)
    }

    /// One page with a data table -> CSV rows.
    pub async fn run_table(&self) -> Result<RunReport, PipelineError> {
        let config = &self.config.table;
        let extractor = TableExtractor::with_parts(
            &config.table_selector,
            &config.header_selector,
            &config.row_selector,
            &config.cell_selector,
        )?;
        let mut run = RunReport::new("table");

        match ensure_output_dir(&config.output_dir) {
            Ok(()) => qa_info!("Directory {:?} is ready.", config.output_dir),
            Err(err) => qa_warn!("Directory {:?} is not usable: {}", config.output_dir, err),
        }

        start_stage(Stage::Fetch, &config.url);
        let mut fetched = StageReport::new(Stage::Fetch);
        let request = FetchRequest::new(config.url.as_str());
        match self.fetcher.fetch(&request).await {
            Ok(document) => fetched.push_item(document),
            Err(err) => {
                record_fetch_failure(&mut fetched, &request, &err);
            }
        }
        let documents = finish_stage(&mut run, fetched);

        start_stage(Stage::Extract, format!("table {}", config.table_selector));
        let mut extracted = StageReport::new(Stage::Extract);
        for document in &documents {
            if let Some(rows) = extract_document(&extractor, document, &mut extracted) {
                for row in rows {
                    extracted.push_item(row);
                }
            }
        }
        let rows = finish_stage(&mut run, extracted);

        start_stage(Stage::Clean, format!("{} rows", rows.len()));
        let cleaner = Cleaner::new(config.clean.clone());
        let mut cleaned = StageReport::new(Stage::Clean);
        for row in rows {
            let row: TableRow = row
                .into_iter()
                .map(|(header, cell)| (header, cleaner.clean(&cell)))
                .collect();
            cleaned.push_item(row);
        }
        let rows = finish_stage(&mut run, cleaned);

        start_stage(Stage::Generate, "table rows");
        let records = generate_stage(&mut run, rows_to_records(rows));

        persist_stage(&mut run, &records, &config.output_path());
        Ok(run)
    }

    /// arXiv search -> PDF downloads -> extracted and cleaned text files ->
    /// segmented QA pairs, plus word-count statistics.
    pub async fn run_papers(&self) -> Result<RunReport, PipelineError> {
        let config = &self.config.papers;
        let mut run = RunReport::new("papers");

        for dir in [
            &config.pdf_dir,
            &config.extracted_dir,
            &config.cleaned_dir,
            &config.results_dir,
        ] {
            match ensure_output_dir(dir) {
                Ok(()) => qa_info!("Directory {:?} is ready.", dir),
                Err(err) => qa_warn!("Directory {:?} is not usable: {}", dir, err),
            }
        }

        start_stage(Stage::Discover, format!("searching for '{}'", config.query));
        let mut discovered = StageReport::new(Stage::Discover);
        let request = FetchRequest::new(config.search_url.as_str())
            .with_query("query", config.query.as_str())
            .with_query("searchtype", config.search_type.as_str())
            .with_query("source", config.search_source.as_str());
        match self.fetcher.fetch(&request).await {
            Ok(page) => match decode_text(&page.bytes, page.content_type()) {
                Ok(decoded) => {
                    for link in discover_pdf_links(&decoded.text, &config.link_base, config.max_papers)
                    {
                        discovered.push_item(link);
                    }
                }
                Err(err) => skip(&mut discovered, request.display_url(), DiagnosticKind::Decode, err),
            },
            Err(err) => {
                record_fetch_failure(&mut discovered, &request, &err);
            }
        }
        qa_info!("Found {} PDFs.", discovered.succeeded());
        let links = finish_stage(&mut run, discovered);

        start_stage(Stage::Fetch, format!("downloading {} PDFs", links.len()));
        let mut downloaded = StageReport::new(Stage::Fetch);
        let pdf_writer = AtomicFileWriter::new(config.pdf_dir.clone());
        for (idx, link) in links.iter().enumerate() {
            let filename = format!("paper_{}.pdf", idx + 1);
            let request = FetchRequest::new(link.as_str()).pdf();
            match self.fetcher.fetch(&request).await {
                Ok(document) => match pdf_writer.write(&filename, &document.bytes) {
                    Ok(path) => {
                        qa_info!("Downloaded: {} -> {:?}", link, path);
                        downloaded.push_item(path);
                    }
                    Err(err) => skip(&mut downloaded, link, DiagnosticKind::Io, err),
                },
                Err(err) => {
                    record_fetch_failure(&mut downloaded, &request, &err);
                }
            }
        }
        finish_stage(&mut run, downloaded);

        start_stage(Stage::Extract, format!("PDFs in {:?}", config.pdf_dir));
        let extractor = PdfExtractor::new(self.pdf_backend.clone());
        let mut extracted = StageReport::new(Stage::Extract);
        match list_files_with_extension(&config.pdf_dir, "pdf") {
            Ok(paths) => {
                for path in paths {
                    extract_pdf_file(&extractor, &path, &config.extracted_dir, &mut extracted);
                }
            }
            Err(err) => skip(
                &mut extracted,
                config.pdf_dir.display().to_string(),
                DiagnosticKind::Io,
                err,
            ),
        }
        let texts = finish_stage(&mut run, extracted);

        start_stage(Stage::Clean, format!("{} text files", texts.len()));
        let cleaner = Cleaner::new(config.clean.clone());
        let mut cleaned = StageReport::new(Stage::Clean);
        for item in &texts {
            let text = cleaner.clean(&item.text);
            match write_text_file(&config.cleaned_dir, &item.file_name, &text) {
                Ok(_) => {
                    qa_info!("Cleaned: {}", item.file_name);
                    cleaned.push_item(ExtractedText {
                        file_name: item.file_name.clone(),
                        text,
                    });
                }
                Err(err) => skip(&mut cleaned, item.file_name.as_str(), DiagnosticKind::Io, err),
            }
        }
        let cleaned_texts = finish_stage(&mut run, cleaned);

        start_stage(Stage::Generate, "segmented QA pairs");
        let units: Vec<TextUnit> = cleaned_texts
            .iter()
            .enumerate()
            .map(|(i, item)| TextUnit::titled(i, item.file_name.as_str(), item.text.as_str()))
            .collect();
        let generator = PairGenerator::segmented(config.segmentation.clone());
        let records = generate_stage(&mut run, generator.generate(&units));

        persist_stage(&mut run, &records, &config.qa_path());

        if config.write_statistics {
            start_stage(Stage::Analyze, format!("statistics into {:?}", config.results_dir));
            let mut analyzed = StageReport::new(Stage::Analyze);
            let corpus = CorpusStatistics::from_texts(
                texts
                    .iter()
                    .map(|item| (item.file_name.as_str(), item.text.as_str())),
                &WhitespaceWordCounter,
            );
            let qa = QaStatistics::from_records(&records, &WhitespaceWordCounter);
            match write_statistics(&config.results_dir, &corpus, &qa) {
                Ok(paths) => {
                    for path in paths {
                        qa_info!("Statistics saved to {:?}", path);
                        analyzed.push_item(path);
                    }
                }
                Err(err) => skip(
                    &mut analyzed,
                    config.results_dir.display().to_string(),
                    DiagnosticKind::Io,
                    err,
                ),
            }
            finish_stage(&mut run, analyzed);
        }

        Ok(run)
    }
}

struct ExtractedText {
    file_name: String,
    text: String,
}

fn start_stage(stage: Stage, detail: impl Display) {
    qa_info!("Starting {}: {}", stage, detail);
}

fn finish_stage<T>(run: &mut RunReport, report: StageReport<T>) -> Vec<T> {
    qa_info!("{}", report.summary_line());
    run.record_stage(report)
}

fn skip<T>(
    report: &mut StageReport<T>,
    subject: impl Into<String>,
    kind: DiagnosticKind,
    err: impl Display,
) {
    let diagnostic = report.push_diagnostic(subject, kind, err.to_string());
    qa_warn!("{}", diagnostic);
}

fn extract_document<E: Extractor, T>(
    extractor: &E,
    document: &Document,
    report: &mut StageReport<T>,
) -> Option<Vec<E::Unit>> {
    let subject = document.source.location.as_str();
    match extractor.extract(document) {
        Ok(extraction) => {
            for issue in &extraction.issues {
                skip(report, subject, issue.diagnostic_kind(), issue);
            }
            Some(extraction.units)
        }
        Err(err) => {
            let kind = err.diagnostic_kind();
            skip(report, subject, kind, err);
            None
        }
    }
}

fn extract_pdf_file(
    extractor: &PdfExtractor,
    path: &Path,
    output_dir: &Path,
    report: &mut StageReport<ExtractedText>,
) {
    let subject = path.display().to_string();
    let Some(pdf_name) = path.file_name().and_then(|name| name.to_str()) else {
        skip(report, subject, DiagnosticKind::Io, "file name is not valid UTF-8");
        return;
    };
    let document = match Document::from_pdf_file(path) {
        Ok(document) => document,
        Err(err) => {
            skip(report, subject, DiagnosticKind::Io, err);
            return;
        }
    };
    let Some(pages) = extract_document(extractor, &document, report) else {
        return;
    };

    let text: String = pages.iter().map(|page| page.text.as_str()).collect();
    let file_name = text_filename_for(pdf_name);
    match write_text_file(output_dir, &file_name, &text) {
        Ok(written) => {
            qa_info!("Extracted text: {} -> {:?}", subject, written);
            report.push_item(ExtractedText { file_name, text });
        }
        Err(err) => skip(report, subject, DiagnosticKind::Io, err),
    }
}

fn renumber(units: Vec<TextUnit>) -> Vec<TextUnit> {
    units
        .into_iter()
        .enumerate()
        .map(|(index, unit)| TextUnit { index, ..unit })
        .collect()
}

fn generate_stage(run: &mut RunReport, records: Vec<Record>) -> Vec<Record> {
    let mut generated = StageReport::new(Stage::Generate);
    for record in records {
        generated.push_item(record);
    }
    finish_stage(run, generated)
}

fn persist_stage(run: &mut RunReport, records: &[Record], destination: &Path) {
    start_stage(Stage::Persist, format!("{} records to {:?}", records.len(), destination));
    let mut persisted: StageReport<PathBuf> = StageReport::new(Stage::Persist);
    match persist_records(records, destination, RecordFormat::from_path(destination)) {
        Ok(path) => {
            qa_info!("Data saved to {:?}", path);
            run.records_written = records.len();
            run.output = Some(path.clone());
            persisted.push_item(path);
        }
        Err(err) => {
            let kind = match err {
                PersistError::Empty => DiagnosticKind::Empty,
                _ => DiagnosticKind::Io,
            };
            skip(&mut persisted, destination.display().to_string(), kind, err);
        }
    }
    finish_stage(run, persisted);
}
